use crate::shared::date_utils::DueIndicator;
use contracts::domain::a001_invoice::status::badge_variant;
use contracts::domain::a001_invoice::InvoiceStatus;
use leptos::prelude::*;

/// CSS class for a badge variant; unknown variants render as neutral
pub fn variant_class(variant: &str) -> &'static str {
    match variant {
        "primary" => "badge badge--primary",
        "success" => "badge badge--success",
        "warning" => "badge badge--warning",
        "error" => "badge badge--error",
        _ => "badge badge--neutral",
    }
}

/// Invoice lifecycle status, e.g. a neutral "Draft" badge
#[component]
pub fn InvoiceStatusBadge(#[prop(into)] status: String) -> impl IntoView {
    let label = InvoiceStatus::from_code(&status)
        .map(|s| s.display_name().to_string())
        .unwrap_or_else(|| status.clone());
    let class = format!(
        "{} badge--status-{}",
        variant_class(badge_variant(&status)),
        status.trim().to_lowercase()
    );

    view! { <span class=class>{label}</span> }
}

#[component]
pub fn ConfirmationBadge(confirmed: bool) -> impl IntoView {
    let (variant, label) = if confirmed {
        ("success", "Confirmed")
    } else {
        ("warning", "Not Confirmed")
    };

    view! { <span class=variant_class(variant)>{label}</span> }
}

/// Days until due; plain text unless overdue or close
#[component]
pub fn DueBadge(indicator: DueIndicator) -> impl IntoView {
    match indicator.variant {
        Some(variant) => view! { <span class=variant_class(variant)>{indicator.label}</span> }.into_any(),
        None => view! { <span class="text-muted">{indicator.label}</span> }.into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_class_falls_back_to_neutral() {
        assert_eq!(variant_class("success"), "badge badge--success");
        assert_eq!(variant_class("info"), "badge badge--neutral");
    }
}
