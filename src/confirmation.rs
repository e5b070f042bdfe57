use chrono::Datelike;

const TEMPLATE: &str = include_str!("../assets/confirmation.html");

// Rendered welcome email
#[derive(Debug, Clone)]
pub struct ConfirmationEmail {
    pub subject: String,
    pub html: String,
}

impl ConfirmationEmail {
    pub fn render(brand: &str) -> Self {
        Self::render_for_year(brand, chrono::Utc::now().year())
    }

    pub fn render_for_year(brand: &str, year: i32) -> Self {
        let html = TEMPLATE
            .replace("{{brand_upper}}", &brand.to_uppercase())
            .replace("{{brand}}", brand)
            .replace("{{year}}", &year.to_string());

        Self {
            subject: format!("Welcome to {brand} Waitlist!"),
            html,
        }
    }
}
