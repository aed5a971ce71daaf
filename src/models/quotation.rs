use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuing company letterhead block. Effectively constant for a single
/// installation; stored with each record so old quotations keep the
/// details they were issued under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub pvt: String, // business registration number
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: "Wimwa Tech General Supplies Limited".to_string(),
            address: "P.O Box 273 -00206, Kiserian".to_string(),
            phone: "+254 712953780".to_string(),
            email: "wimwatech@gmail.com".to_string(),
            pvt: "PVT-Y2U9QXGP".to_string(),
        }
    }
}

/// Client block. Only `name` is required before save; the rest may stay
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

/// One quotation row. `total` is derived and must equal
/// `quantity * price` whenever the item is displayed or saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub price: f64,
    pub total: f64,
}

impl LineItem {
    /// Fresh blank row as the editor creates it.
    pub fn blank() -> Self {
        Self {
            description: String::new(),
            quantity: 1.0,
            price: 0.0,
            total: 0.0,
        }
    }
}

/// A persisted quotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: Uuid,
    pub quotation_number: String,
    pub date: String,
    pub company_info: CompanyInfo,
    pub client_info: ClientInfo,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub grand_total: f64,
    pub created_at: DateTime<Utc>,
}

/// Create payload sent by the editor. The server assigns `id` and stamps
/// `createdAt` at persistence time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuotation {
    pub quotation_number: String,
    pub date: String,
    pub company_info: CompanyInfo,
    pub client_info: ClientInfo,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub grand_total: f64,
}

impl NewQuotation {
    /// Promote to a stored record with a fresh id and timestamp.
    pub fn into_quotation(self, id: Uuid, created_at: DateTime<Utc>) -> Quotation {
        Quotation {
            id,
            quotation_number: self.quotation_number,
            date: self.date,
            company_info: self.company_info,
            client_info: self.client_info,
            items: self.items,
            subtotal: self.subtotal,
            grand_total: self.grand_total,
            created_at,
        }
    }
}

/// Partial update for PUT. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationPatch {
    pub quotation_number: Option<String>,
    pub date: Option<String>,
    pub company_info: Option<CompanyInfo>,
    pub client_info: Option<ClientInfo>,
    pub items: Option<Vec<LineItem>>,
    pub subtotal: Option<f64>,
    pub grand_total: Option<f64>,
}

impl QuotationPatch {
    /// Merge provided fields onto an existing record.
    pub fn apply_to(self, existing: &mut Quotation) {
        if let Some(v) = self.quotation_number {
            existing.quotation_number = v;
        }
        if let Some(v) = self.date {
            existing.date = v;
        }
        if let Some(v) = self.company_info {
            existing.company_info = v;
        }
        if let Some(v) = self.client_info {
            existing.client_info = v;
        }
        if let Some(v) = self.items {
            existing.items = v;
        }
        if let Some(v) = self.subtotal {
            existing.subtotal = v;
        }
        if let Some(v) = self.grand_total {
            existing.grand_total = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotation_serializes_with_camel_case_wire_names() {
        let q = Quotation {
            id: Uuid::nil(),
            quotation_number: "Quote-1234".to_string(),
            date: "06/08/2026".to_string(),
            company_info: CompanyInfo::default(),
            client_info: ClientInfo {
                name: "Acme Ltd".to_string(),
                ..ClientInfo::default()
            },
            items: vec![LineItem {
                description: "Cement bags".to_string(),
                quantity: 3.0,
                price: 1500.0,
                total: 4500.0,
            }],
            subtotal: 4500.0,
            grand_total: 4500.0,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["quotationNumber"], "Quote-1234");
        assert_eq!(json["clientInfo"]["name"], "Acme Ltd");
        assert_eq!(json["grandTotal"], 4500.0);
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["items"][0]["total"], 4500.0);
    }

    #[test]
    fn client_info_optional_fields_default_to_empty() {
        let parsed: ClientInfo = serde_json::from_str(r#"{"name":"Jane"}"#).unwrap();
        assert_eq!(parsed.name, "Jane");
        assert!(parsed.address.is_empty());
        assert!(parsed.phone.is_empty());
        assert!(parsed.email.is_empty());
    }

    #[test]
    fn patch_merges_only_provided_fields() {
        let mut q = NewQuotation {
            quotation_number: "Quote-1".to_string(),
            date: "01/01/2026".to_string(),
            company_info: CompanyInfo::default(),
            client_info: ClientInfo {
                name: "Old Name".to_string(),
                ..ClientInfo::default()
            },
            items: vec![LineItem::blank()],
            subtotal: 0.0,
            grand_total: 0.0,
        }
        .into_quotation(Uuid::nil(), Utc::now());

        let patch = QuotationPatch {
            client_info: Some(ClientInfo {
                name: "New Name".to_string(),
                ..ClientInfo::default()
            }),
            subtotal: Some(250.0),
            grand_total: Some(250.0),
            ..QuotationPatch::default()
        };
        patch.apply_to(&mut q);

        assert_eq!(q.client_info.name, "New Name");
        assert_eq!(q.subtotal, 250.0);
        assert_eq!(q.quotation_number, "Quote-1");
        assert_eq!(q.date, "01/01/2026");
    }
}
