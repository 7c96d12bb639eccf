use md5::{Digest, Md5};
use zeroize::Zeroizing;

/// Separator between the signed fields. PayU never allows it inside them.
pub const DELIMITER: &str = "~";

/// Produces WebCheckout request signatures.
///
/// The digest is `MD5(apiKey~merchantId~referenceCode~amount~currency)` in
/// lowercase hex. `amount` must be formatted exactly as it is transmitted
/// (see [`crate::validation::checkout::format_amount`]), otherwise the
/// processor rejects the signature.
#[derive(Clone)]
pub struct Signer {
    api_key: Zeroizing<String>,
    merchant_id: String,
}

impl Signer {
    /// Creates a new `Signer`.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The merchant API key.
    /// * `merchant_id` - The merchant identifier.
    pub fn new(api_key: Zeroizing<String>, merchant_id: String) -> Self {
        Self {
            api_key,
            merchant_id,
        }
    }

    /// Signs a payment request.
    pub fn sign(&self, reference: &str, amount: &str, currency: &str) -> String {
        let raw = Zeroizing::new(
            [
                self.api_key.as_str(),
                self.merchant_id.as_str(),
                reference,
                amount,
                currency,
            ]
            .join(DELIMITER),
        );

        hex::encode(Md5::digest(raw.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SANDBOX_API_KEY, SANDBOX_MERCHANT_ID};

    fn sandbox_signer() -> Signer {
        Signer::new(
            Zeroizing::new(SANDBOX_API_KEY.to_string()),
            SANDBOX_MERCHANT_ID.to_string(),
        )
    }

    #[test]
    fn matches_published_sandbox_example() {
        let signer = sandbox_signer();
        assert_eq!(
            signer.sign("TestPayU", "3", "USD"),
            "ba9ffa71559580175585e45ce70b6c37"
        );
    }

    #[test]
    fn digest_covers_fields_in_order() {
        let signer = sandbox_signer();
        let expected = hex::encode(Md5::digest(
            b"4Vj8eK4rloUd272L48hsrarnUA~508029~R1~10.00~COP",
        ));
        assert_eq!(signer.sign("R1", "10.00", "COP"), expected);
        assert_ne!(signer.sign("R1", "10.00", "COP"), signer.sign("R1", "COP", "10.00"));
    }

    #[test]
    fn is_deterministic_lowercase_hex() {
        let signer = sandbox_signer();
        let first = signer.sign("order-42", "10.00", "COP");
        let second = signer.sign("order-42", "10.00", "COP");
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn amount_formatting_changes_signature() {
        let signer = sandbox_signer();
        assert_ne!(signer.sign("R1", "10", "COP"), signer.sign("R1", "10.00", "COP"));
    }

    #[test]
    fn key_and_merchant_are_part_of_digest() {
        let other = Signer::new(Zeroizing::new("other-key".to_string()), "1".to_string());
        assert_ne!(
            other.sign("R1", "10.00", "COP"),
            sandbox_signer().sign("R1", "10.00", "COP")
        );
    }
}
