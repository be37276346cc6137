use secrecy::{ExposeSecret as _, SecretString};

pub fn get_text_height(ui: &mut egui::Ui) -> f32 {
    egui::TextStyle::Body
        .resolve(ui.style())
        .size
        .max(ui.spacing().interact_size.y)
}

pub fn ui_password_edit(
    ui: &mut egui::Ui,
    password: &mut SecretString,
    hint_text: &str,
) -> egui::Response {
    let mut temp = password.expose_secret().to_owned();
    let result = ui.add(
        egui::TextEdit::singleline(&mut temp)
            .password(true)
            .hint_text(hint_text),
    );
    *password = SecretString::from(temp);
    result
}

/// Financial values arrive in raw dollars, render them compactly
pub fn format_financial(value: Option<f64>) -> String {
    match value {
        Some(value) if value.abs() >= 1_000_000_000.0 => {
            format!("${:.2}B", value / 1_000_000_000.0)
        }
        Some(value) if value.abs() >= 1_000_000.0 => format!("${:.2}M", value / 1_000_000.0),
        Some(value) => format!("${value:.0}"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::billions(Some(364_980_000_000.0), "$364.98B")]
    #[case::millions(Some(29_943_000.0), "$29.94M")]
    #[case::small(Some(512.4), "$512")]
    #[case::unreported(None, "-")]
    fn financial_values_render_compactly(#[case] value: Option<f64>, #[case] expect: &str) {
        assert_eq!(format_financial(value), expect);
    }
}
