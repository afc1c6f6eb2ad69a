//! # Sale Payloads
//!
//! The outbound sale submission and the backend's answer, as explicit
//! schemas.
//!
//! ## Submission Round Trip
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Cart ──build_sale_request()──► SaleRequest ──► (transport) ──► backend │
//! │                                                                         │
//! │  backend ──► raw body ──SaleResponse::parse()──┬──► Success { doc? }    │
//! │                                                ├──► Error { message }   │
//! │                                                └──► MalformedResponse   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Request JSON
//! ```json
//! {
//!   "discount": 10.0,
//!   "saleItems": [{ "productId": "A", "batchId": "lot-1", "quantity": 2 }],
//!   "totalAmount": 222.0,
//!   "paymentMethod": "cash",
//!   "customer": "cust-9"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{major_units, Money};
use crate::types::PaymentMethod;

// =============================================================================
// Request
// =============================================================================

/// One line of the sale submission. Price is omitted on purpose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    pub quantity: i64,
}

/// The sale submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    #[serde(with = "major_units")]
    pub discount: Money,
    pub sale_items: Vec<SaleItemRequest>,
    /// Payable amount at build time.
    #[serde(with = "major_units")]
    pub total_amount: Money,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

// =============================================================================
// Response
// =============================================================================

/// A generated document returned with a successful sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// The backend's answer to a sale submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaleResponse {
    #[serde(rename_all = "camelCase")]
    Success {
        #[serde(default)]
        sale_id: Option<String>,
        #[serde(default)]
        receipt_number: Option<String>,
        #[serde(default)]
        document: Option<Document>,
    },
    Error { message: String },
}

/// What the checkout keeps from an accepted sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleConfirmation {
    pub sale_id: Option<String>,
    pub receipt_number: Option<String>,
    pub document: Option<Document>,
}

impl SaleResponse {
    /// Validates a raw response body against the schema.
    ///
    /// A document with no content is dropped rather than handed to the
    /// print collaborator.
    pub fn parse(body: &str) -> CoreResult<Self> {
        let response: SaleResponse = serde_json::from_str(body)
            .map_err(|e| CoreError::MalformedResponse(e.to_string()))?;

        Ok(match response {
            SaleResponse::Success {
                sale_id,
                receipt_number,
                document,
            } => SaleResponse::Success {
                sale_id,
                receipt_number,
                document: document.filter(|d| !d.content.is_empty()),
            },
            SaleResponse::Error { message } if message.trim().is_empty() => SaleResponse::Error {
                message: "Sale was rejected".to_string(),
            },
            other => other,
        })
    }

    /// Splits into the accepted sale or the backend's message.
    pub fn into_result(self) -> Result<SaleConfirmation, String> {
        match self {
            SaleResponse::Success {
                sale_id,
                receipt_number,
                document,
            } => Ok(SaleConfirmation {
                sale_id,
                receipt_number,
                document,
            }),
            SaleResponse::Error { message } => Err(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = SaleRequest {
            discount: Money::from_cents(1000),
            sale_items: vec![
                SaleItemRequest {
                    product_id: "A".into(),
                    batch_id: Some("lot-1".into()),
                    quantity: 2,
                },
                SaleItemRequest {
                    product_id: "B".into(),
                    batch_id: None,
                    quantity: 1,
                },
            ],
            total_amount: Money::from_cents(22_200),
            payment_method: PaymentMethod::Cash,
            customer: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "discount": 10.0,
                "saleItems": [
                    { "productId": "A", "batchId": "lot-1", "quantity": 2 },
                    { "productId": "B", "quantity": 1 }
                ],
                "totalAmount": 222.0,
                "paymentMethod": "cash"
            })
        );
    }

    #[test]
    fn test_parse_success_with_document() {
        let body = r#"{
            "status": "success",
            "saleId": "s-1",
            "document": { "fileName": "receipt.pdf", "contentType": "application/pdf", "content": [37, 80, 68, 70] }
        }"#;

        let confirmation = SaleResponse::parse(body).unwrap().into_result().unwrap();
        assert_eq!(confirmation.sale_id.as_deref(), Some("s-1"));
        assert!(confirmation.receipt_number.is_none());
        assert_eq!(confirmation.document.unwrap().content, b"%PDF".to_vec());
    }

    #[test]
    fn test_parse_success_drops_empty_document() {
        let body = r#"{"status":"success","document":{"fileName":"r.pdf","contentType":"application/pdf","content":[]}}"#;
        let confirmation = SaleResponse::parse(body).unwrap().into_result().unwrap();
        assert!(confirmation.document.is_none());
    }

    #[test]
    fn test_parse_error() {
        let body = r#"{"status":"error","message":"Batch lot-1 has no stock"}"#;
        let result = SaleResponse::parse(body).unwrap().into_result();
        assert_eq!(result.unwrap_err(), "Batch lot-1 has no stock");

        let blank = SaleResponse::parse(r#"{"status":"error","message":" "}"#).unwrap();
        assert_eq!(blank.into_result().unwrap_err(), "Sale was rejected");
    }

    #[test]
    fn test_parse_rejects_unknown_shapes() {
        for body in [
            "",
            "not json",
            r#"{"ok":true}"#,
            r#"{"status":"pending"}"#,
            r#"{"status":"error"}"#,
        ] {
            assert!(
                matches!(SaleResponse::parse(body), Err(CoreError::MalformedResponse(_))),
                "accepted {body:?}"
            );
        }
    }
}
