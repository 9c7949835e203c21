//! Document payload for the registration API
//!
//! Plain data-transfer structures. Field names follow the wire format of the
//! `documents/create` endpoint, which mixes `snake_case` with a few
//! `camelCase` keys. Nothing here validates field content; absent strings are
//! sent as JSON `null`.

use serde::{Deserialize, Serialize};

/// Goods introduction document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub description: Option<Description>,
    pub doc_id: Option<String>,
    pub doc_status: Option<String>,
    pub doc_type: Option<String>,
    #[serde(rename = "importRequest", default)]
    pub import_request: bool,
    pub owner_inn: Option<String>,
    pub participant_inn: Option<String>,
    pub producer_inn: Option<String>,
    pub production_date: Option<String>,
    pub production_type: Option<String>,
    /// Products in submission order
    #[serde(default)]
    pub products: Vec<Product>,
    pub reg_date: Option<String>,
    pub reg_number: Option<String>,
}

/// Nested description block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "participantInn")]
    pub participant_inn: Option<String>,
}

/// A single product line of a [`Document`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub certificate_document: Option<String>,
    pub certificate_document_date: Option<String>,
    pub certificate_document_number: Option<String>,
    pub owner_inn: Option<String>,
    pub producer_inn: Option<String>,
    pub production_date: Option<String>,
    /// Commodity classification code
    pub tnved_code: Option<String>,
    /// Unit identification code
    pub uit_code: Option<String>,
    /// Unit identification code of the transport package
    pub uitu_code: Option<String>,
}
