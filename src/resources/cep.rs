//! Brazilian postal-code (CEP) lookup card

use dashboard_types::Address;

use super::{Resource, TriggerMode, REFERENCE_FRESHNESS};
use crate::envelope::Payload;
use crate::query::{QueryKey, ResourceRequest};

pub const CEP_DIGITS: usize = 8;

pub struct Cep;

/// Digits of a CEP as typed by the user. Only the digits go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CepInput {
    digits: String,
}

impl CepInput {
    /// Keep the digits of `raw`; punctuation and spaces are dropped
    pub fn parse(raw: &str) -> Self {
        Self {
            digits: raw.chars().filter(char::is_ascii_digit).collect(),
        }
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.digits.len() == CEP_DIGITS
    }

    pub fn formatted(&self) -> String {
        format_cep(&self.digits)
    }
}

/// `01001000` → `01001-000`. Up to five digits pass through unchanged;
/// anything past eight is dropped.
pub fn format_cep(value: &str) -> String {
    let digits: String = value
        .chars()
        .filter(char::is_ascii_digit)
        .take(CEP_DIGITS)
        .collect();
    if digits.len() <= 5 {
        digits
    } else {
        format!("{}-{}", &digits[..5], &digits[5..])
    }
}

impl Resource for Cep {
    type Params = CepInput;
    type Payload = Option<Address>;

    const NAME: &'static str = "cep";
    const TRIGGER: TriggerMode = TriggerMode::OnInput;
    const DEFAULT_FRESHNESS: Option<std::time::Duration> = Some(REFERENCE_FRESHNESS);
    const FAILURE_MESSAGE: &'static str = "Could not look up this CEP. Check the number and try again.";

    fn key(params: &CepInput) -> Option<QueryKey> {
        if params.is_empty() {
            return None;
        }
        Some(QueryKey::new(Self::NAME, [params.digits()]))
    }

    fn request(params: &CepInput) -> ResourceRequest {
        ResourceRequest::get(format!("/cep/{}", params.digits()))
    }
}

impl Payload for Option<Address> {
    fn empty() -> Self {
        None
    }

    fn item_count(&self) -> usize {
        usize::from(self.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::unwrap_body;
    use serde_json::json;

    #[test]
    fn test_format_cep() {
        assert_eq!(format_cep("01001000"), "01001-000");
        assert_eq!(format_cep("01001-000"), "01001-000");
        assert_eq!(format_cep("0100"), "0100");
        assert_eq!(format_cep("01001"), "01001");
        assert_eq!(format_cep("010010"), "01001-0");
        assert_eq!(format_cep("0100100099"), "01001-000");
        assert_eq!(format_cep("abc"), "");
    }

    #[test]
    fn test_input_sends_unformatted_digits() {
        let input = CepInput::parse("01001-000");
        assert!(input.is_complete());
        assert_eq!(input.formatted(), "01001-000");
        assert_eq!(Cep::request(&input).path, "/cep/01001000");
        assert_eq!(Cep::key(&input).unwrap().to_string(), "cep:01001000");
    }

    #[test]
    fn test_input_without_digits_is_empty() {
        let input = CepInput::parse(" - ");
        assert!(input.is_empty());
        assert_eq!(Cep::key(&input), None);
    }

    #[test]
    fn test_decodes_wrapped_address() {
        let address: Option<Address> = unwrap_body(
            Cep::NAME,
            json!({
                "success": true,
                "message": "CEP 01001000 encontrado com sucesso",
                "data": {
                    "cep": "01001-000",
                    "street": "Praça da Sé",
                    "neighborhood": "Sé",
                    "city": "São Paulo",
                    "state": "SP"
                }
            }),
        )
        .unwrap();
        let address = address.unwrap();
        assert_eq!(address.street.as_deref(), Some("Praça da Sé"));
        assert_eq!(address.locality().as_deref(), Some("São Paulo - SP"));
    }

    #[test]
    fn test_not_found_is_rejected() {
        let err = unwrap_body::<Option<Address>>(
            Cep::NAME,
            json!({ "success": false, "error": "CEP não encontrado", "cep": "99999999" }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("CEP não encontrado"));
    }
}
