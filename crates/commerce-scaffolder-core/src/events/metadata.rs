//! Event metadata lookup and slug derivation

use super::client::EventsClient;
use crate::error::EventsError;

/// An event code offered to the user, with a slug usable as an action name hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMetadata {
    pub event_code: String,
    pub event_label: String,
    pub derived_slug: String,
}

impl EventMetadata {
    pub fn new(event_code: impl Into<String>, event_label: impl Into<String>) -> Self {
        let event_label = event_label.into();
        Self {
            event_code: event_code.into(),
            derived_slug: slugify(&event_label),
            event_label,
        }
    }

    /// Label shown in the event code checklist
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.event_code, self.event_label)
    }
}

/// Normalize a label into a lowercase, hyphen separated ASCII slug.
///
/// Accented Latin letters are folded to their base letter, every run of other
/// characters becomes a single `-`, and leading/trailing hyphens are trimmed.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_hyphen = false;

    let push = |slug: &mut String, c: char, pending_hyphen: &mut bool| {
        if *pending_hyphen && !slug.is_empty() {
            slug.push('-');
        }
        *pending_hyphen = false;
        slug.push(c.to_ascii_lowercase());
    };

    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            push(&mut slug, c, &mut pending_hyphen);
        } else if c.is_ascii() {
            pending_hyphen = true;
        } else {
            let folded = fold_char(c);
            if folded.is_empty() {
                pending_hyphen = true;
            }
            for f in folded.chars() {
                push(&mut slug, f, &mut pending_hyphen);
            }
        }
    }

    slug
}

/// ASCII replacement for a non-ASCII letter; empty when it has none
fn fold_char(c: char) -> &'static str {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' | 'ạ' | 'ả' | 'ấ' | 'ầ' | 'ẩ'
        | 'ẫ' | 'ậ' | 'ắ' | 'ằ' | 'ẳ' | 'ẵ' | 'ặ' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' | 'Ạ' | 'Ả' | 'Ấ' | 'Ầ' | 'Ẩ'
        | 'Ẫ' | 'Ậ' | 'Ắ' | 'Ằ' | 'Ẳ' | 'Ẵ' | 'Ặ' => "A",
        'æ' => "ae",
        'Æ' => "AE",
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => "c",
        'Ç' | 'Ć' | 'Č' | 'Ĉ' | 'Ċ' => "C",
        'đ' | 'ď' | 'ð' => "d",
        'Đ' | 'Ď' | 'Ð' => "D",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' | 'ẹ' | 'ẻ' | 'ẽ' | 'ế' | 'ề' | 'ể'
        | 'ễ' | 'ệ' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ė' | 'Ę' | 'Ě' | 'Ẹ' | 'Ẻ' | 'Ẽ' | 'Ế' | 'Ề' | 'Ể'
        | 'Ễ' | 'Ệ' => "E",
        'ğ' | 'ĝ' | 'ġ' | 'ģ' => "g",
        'Ğ' | 'Ĝ' | 'Ġ' | 'Ģ' => "G",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' | 'ỉ' | 'ị' | 'ĩ' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'Į' | 'İ' | 'Ỉ' | 'Ị' | 'Ĩ' => "I",
        'ł' | 'ľ' | 'ĺ' | 'ļ' => "l",
        'Ł' | 'Ľ' | 'Ĺ' | 'Ļ' => "L",
        'ñ' | 'ń' | 'ň' | 'ņ' => "n",
        'Ñ' | 'Ń' | 'Ň' | 'Ņ' => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' | 'ơ' | 'ọ' | 'ỏ' | 'ố' | 'ồ' | 'ổ'
        | 'ỗ' | 'ộ' | 'ớ' | 'ờ' | 'ở' | 'ỡ' | 'ợ' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ő' | 'Ơ' | 'Ọ' | 'Ỏ' | 'Ố' | 'Ồ' | 'Ổ'
        | 'Ỗ' | 'Ộ' | 'Ớ' | 'Ờ' | 'Ở' | 'Ỡ' | 'Ợ' => "O",
        'œ' => "oe",
        'Œ' => "OE",
        'ř' | 'ŕ' => "r",
        'Ř' | 'Ŕ' => "R",
        'ß' => "ss",
        'ś' | 'š' | 'ş' | 'ș' => "s",
        'Ś' | 'Š' | 'Ş' | 'Ș' => "S",
        'ť' | 'ţ' | 'ț' => "t",
        'Ť' | 'Ţ' | 'Ț' => "T",
        'þ' => "th",
        'Þ' => "TH",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' | 'ư' | 'ụ' | 'ủ' | 'ũ' | 'ứ' | 'ừ'
        | 'ử' | 'ữ' | 'ự' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' | 'Ű' | 'Ų' | 'Ư' | 'Ụ' | 'Ủ' | 'Ũ' | 'Ứ' | 'Ừ'
        | 'Ử' | 'Ữ' | 'Ự' => "U",
        'ý' | 'ÿ' | 'ỳ' | 'ỵ' | 'ỷ' | 'ỹ' => "y",
        'Ý' | 'Ÿ' | 'Ỳ' | 'Ỵ' | 'Ỷ' | 'Ỹ' => "Y",
        'ź' | 'ż' | 'ž' => "z",
        'Ź' | 'Ż' | 'Ž' => "Z",
        _ => "",
    }
}

/// Fetch the event metadata of a provider.
///
/// Any lookup failure (unknown provider id, network error) is reported as
/// `ProviderLookupFailed` so the caller can show it and carry on with an
/// empty list.
pub async fn fetch_event_metadata<E: EventsClient>(
    client: &E,
    provider_id: &str,
) -> Result<Vec<EventMetadata>, EventsError> {
    let records = client
        .event_metadata(provider_id)
        .await
        .map_err(|e| EventsError::ProviderLookupFailed {
            provider_id: provider_id.to_string(),
            message: e.to_string(),
        })?;

    Ok(records
        .into_iter()
        .map(|record| EventMetadata::new(record.event_code, record.label))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryEvents;

    #[test]
    fn test_slugify_basic_label() {
        assert_eq!(slugify("Order Created"), "order-created");
        assert_eq!(slugify("  Product -- Updated!  "), "product-updated");
    }

    #[test]
    fn test_slugify_folds_accents() {
        assert_eq!(slugify("Commande créée"), "commande-creee");
        assert_eq!(slugify("Đơn hàng đã giao"), "don-hang-da-giao");
        assert_eq!(slugify("Größe ändern"), "grosse-andern");
    }

    #[test]
    fn test_slugify_drops_unmappable_characters() {
        assert_eq!(slugify("Order 注文 created"), "order-created");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_is_pure() {
        let label = "Customer Address Saved";
        assert_eq!(slugify(label), slugify(label));
        assert_eq!(slugify(&slugify(label)), slugify(label));
    }

    #[test]
    fn test_display_label() {
        let meta = EventMetadata::new(
            "com.adobe.commerce.observer.sales_order_save_after",
            "Order saved",
        );
        assert_eq!(
            meta.display_label(),
            "com.adobe.commerce.observer.sales_order_save_after (Order saved)"
        );
        assert_eq!(meta.derived_slug, "order-saved");
    }

    #[tokio::test]
    async fn test_fetch_event_metadata_derives_slugs() {
        let events = InMemoryEvents::default().with_provider(
            "p-1",
            "Commerce",
            "dx_commerce_events",
            &[("com.adobe.commerce.order.created", "Order Created")],
        );

        let metadata = fetch_event_metadata(&events, "p-1").await.unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata[0].derived_slug, "order-created");
    }

    #[tokio::test]
    async fn test_fetch_event_metadata_unknown_provider() {
        let events = InMemoryEvents::default();
        let err = fetch_event_metadata(&events, "nope").await.unwrap_err();
        match err {
            EventsError::ProviderLookupFailed { provider_id, .. } => assert_eq!(provider_id, "nope"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
