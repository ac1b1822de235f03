
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use minijinja::{context, Value as TemplateValue};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    flash,
    models::{
        ApiResult, FlavorForm, LowStockItem, SaleForm, SalePayload, StockForm, StockPayload,
    },
    state::AppState,
    store::{UpdateMode, LOW_STOCK_THRESHOLD},
    utils,
};

fn render(state: &AppState, name: &str, ctx: TemplateValue) -> Result<Html<String>, AppError> {
    Ok(Html(state.templates.get_template(name)?.render(ctx)?))
}

pub async fn dashboard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = flash::take(jar);

    let inventory = state.store.get_inventory().await;

    // The dashboard highlights flavors running low but not yet out.
    let low_stock: Vec<LowStockItem> = inventory
        .iter()
        .filter(|(_, &count)| count > 0 && count < LOW_STOCK_THRESHOLD)
        .map(|(flavor, &count)| LowStockItem {
            flavor: flavor.clone(),
            count,
        })
        .collect();

    let total_items: u32 = inventory.values().sum();
    let total_flavors = inventory.values().filter(|&&count| count > 0).count();

    let page = render(
        &state,
        "dashboard.html",
        context! {
            inventory,
            low_stock,
            total_items,
            total_flavors,
            flavors => state.store.catalog().await,
            flash,
        },
    )?;

    Ok((jar, page))
}

pub async fn add_stock_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = flash::take(jar);

    let page = render(
        &state,
        "add_stock.html",
        context! {
            flavors => state.store.get_all_flavors().await,
            flash,
        },
    )?;

    Ok((jar, page))
}

pub async fn add_stock_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<StockForm>,
) -> impl IntoResponse {
    let flavor = form.flavor.trim();

    let jar = if flavor.is_empty() || form.count == 0 {
        flash::error(jar, "Please provide valid flavor and count.")
    } else {
        match state
            .store
            .update_inventory(flavor, form.count, UpdateMode::Add)
            .await
        {
            Ok(_) => flash::success(
                jar,
                format!(
                    "Successfully added {} {} ice creams to inventory!",
                    form.count, flavor
                ),
            ),
            Err(_) => flash::error(jar, "Error adding stock. Please try again."),
        }
    };

    (jar, Redirect::to("/"))
}

pub async fn record_sale_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = flash::take(jar);

    let page = render(
        &state,
        "record_sale.html",
        context! {
            flavors => state.store.get_all_flavors().await,
            inventory => state.store.get_inventory().await,
            flash,
        },
    )?;

    Ok((jar, page))
}

pub async fn record_sale_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<SaleForm>,
) -> impl IntoResponse {
    let flavor = form.flavor.trim();

    let jar = if flavor.is_empty() || form.quantity == 0 {
        flash::error(jar, "Please provide valid flavor and quantity.")
    } else {
        match state.store.record_sale(flavor, form.quantity).await {
            Ok(()) => flash::success(
                jar,
                format!(
                    "Successfully recorded sale: {} {} ice creams!",
                    form.quantity, flavor
                ),
            ),
            Err(e) if e.is_rejection() => flash::error(jar, format!("{e}.")),
            Err(_) => flash::error(jar, "Error recording sale. Please try again."),
        }
    };

    (jar, Redirect::to("/"))
}

pub async fn manage_flavors_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let (jar, flash) = flash::take(jar);

    let page = render(
        &state,
        "manage_flavors.html",
        context! {
            all_flavors => state.store.get_all_flavors().await,
            inventory => state.store.get_inventory().await,
            flash,
        },
    )?;

    Ok((jar, page))
}

pub async fn manage_flavors_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<FlavorForm>,
) -> impl IntoResponse {
    let jar = match state.store.add_flavor(&form.new_flavor).await {
        Ok(flavor) => flash::success(jar, format!("Successfully added new flavor: {flavor}!")),
        Err(e) if e.is_rejection() => flash::error(jar, format!("{e}.")),
        Err(_) => flash::error(jar, "Error adding flavor. Please try again."),
    };

    (jar, Redirect::to("/manage_flavors"))
}

pub async fn sales_report(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let sales = state.store.get_sales_data(30).await;
    let summary = utils::summarize_sales(&sales, utils::today());

    render(
        &state,
        "sales_report.html",
        context! {
            today_sales => summary.today_sales,
            total_sales_today => summary.total_sold_today,
            top_flavors => summary.top_flavors,
            recent_sales => &sales[..sales.len().min(20)],
        },
    )
}

pub async fn api_inventory(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.get_inventory().await)
}

pub async fn api_add_stock(
    State(state): State<AppState>,
    Json(payload): Json<StockPayload>,
) -> impl IntoResponse {
    let flavor = payload.flavor.trim();

    if flavor.is_empty() || payload.count == 0 {
        return api_failure("Please provide valid flavor and count");
    }

    match state
        .store
        .update_inventory(flavor, payload.count, UpdateMode::Add)
        .await
    {
        Ok(_) => api_success(format!("Added {} {} to inventory", payload.count, flavor)),
        Err(_) => api_failure("Error adding stock"),
    }
}

pub async fn api_record_sale(
    State(state): State<AppState>,
    Json(payload): Json<SalePayload>,
) -> impl IntoResponse {
    let flavor = payload.flavor.trim();

    if flavor.is_empty() {
        return api_failure("Please provide valid flavor and quantity");
    }

    match state.store.record_sale(flavor, payload.quantity).await {
        Ok(()) => api_success(format!("Recorded sale: {} {}", payload.quantity, flavor)),
        Err(e) if e.is_rejection() => api_failure(&e.to_string()),
        Err(_) => api_failure("Error recording sale"),
    }
}

fn api_success(message: String) -> (StatusCode, Json<ApiResult>) {
    (
        StatusCode::OK,
        Json(ApiResult {
            success: true,
            message,
        }),
    )
}

fn api_failure(message: &str) -> (StatusCode, Json<ApiResult>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResult {
            success: false,
            message: message.to_string(),
        }),
    )
}

pub async fn debug_info(State(state): State<AppState>) -> Json<Value> {
    let backend = state.store.backend_tag();

    let mut info = json!({
        "backend": backend,
        "supabase_url_set": state.config.supabase_url.is_some(),
        "supabase_key_set": state.config.supabase_key.is_some(),
        "storage_mode": if backend == "supabase" { "Database" } else { "Local JSON" },
    });

    match state.store.probe().await {
        Ok(records) => {
            info["backend_test"] = json!("SUCCESS");
            info["records"] = json!(records);
        }
        Err(e) => {
            info["backend_test"] = json!(format!("FAILED: {e}"));
        }
    }

    Json(info)
}
