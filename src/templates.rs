use minijinja::Environment;

/// Pages are embedded at compile time so the binary ships self-contained.
pub fn environment() -> Environment<'static> {
    let mut env = Environment::new();

    for (name, source) in [
        ("base.html", include_str!("../templates/base.html")),
        ("dashboard.html", include_str!("../templates/dashboard.html")),
        ("add_stock.html", include_str!("../templates/add_stock.html")),
        (
            "record_sale.html",
            include_str!("../templates/record_sale.html"),
        ),
        (
            "manage_flavors.html",
            include_str!("../templates/manage_flavors.html"),
        ),
        (
            "sales_report.html",
            include_str!("../templates/sales_report.html"),
        ),
    ] {
        env.add_template(name, source)
            .expect("Templates misconfigured!");
    }

    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_templates_parse() {
        let env = environment();

        for name in [
            "dashboard.html",
            "add_stock.html",
            "record_sale.html",
            "manage_flavors.html",
            "sales_report.html",
        ] {
            assert!(env.get_template(name).is_ok(), "{name} missing");
        }
    }

    #[test]
    fn test_dashboard_renders() {
        let env = environment();
        let page = env
            .get_template("dashboard.html")
            .unwrap()
            .render(context! {
                inventory => std::collections::BTreeMap::from([("Vanilla", 5)]),
                low_stock => Vec::<(String, u32)>::new(),
                total_items => 5,
                total_flavors => 1,
                flash => None::<String>,
            })
            .unwrap();

        assert!(page.contains("Vanilla"));
    }
}
