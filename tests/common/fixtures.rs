//! Software record fixtures

use apm_console::shared::{Software, SoftwareFields, SoftwareType};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()
}

/// A minimal `web` record
pub fn software(id: &str, name: &str) -> Software {
    Software {
        id: id.to_string(),
        foreign_key: None,
        display_name: name.to_string(),
        description: None,
        software_type: SoftwareType::Web,
        software_subtype: None,
        vendor: None,
        manufacturer: None,
        install_type: None,
        product_type: None,
        context: None,
        lifecycle_status: None,
        implementation_status: None,
        created_at: created_at(),
        updated_at: created_at(),
    }
}

pub fn fields(name: &str) -> SoftwareFields {
    SoftwareFields::new(name, SoftwareType::Web)
}

/// What the server would answer a create with
pub fn created_from(id: &str, fields: &SoftwareFields) -> Software {
    let mut record = software(id, &fields.display_name);
    record.merge(fields, created_at());
    record
}

/// `GET /software` body for the given records
pub fn list_body(records: &[Software]) -> Value {
    json!({
        "data": records,
        "limit": 50,
        "offset": 0,
        "count": records.len(),
    })
}
