//! Catalog of forms shown by the form list.

use super::error::ServiceError;

/// Specifying the lifecycle state of a form.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormStatus {
    Draft,
    Active,
    Ended,
}

impl FormStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FormStatus::Draft => "Draft",
            FormStatus::Active => "Collecting",
            FormStatus::Ended => "Ended",
        }
    }
}

/// Defines form list entry data structure.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormItem {
    pub id: String,
    pub title: String,
    pub status: FormStatus,
    pub submit_count_today: u32,
    pub submit_count_total: u32,
    pub last_updated: String,
    pub channels: Vec<String>,
}

/// Oversees the forms known to the console.
///
#[derive(Clone, Debug)]
pub struct FormCatalog {
    forms: Vec<FormItem>,
}

impl Default for FormCatalog {
    fn default() -> Self {
        FormCatalog::seeded()
    }
}

impl FormCatalog {
    pub fn seeded() -> Self {
        let form = |id: &str, title: &str, status, today, total, updated: &str, channels: &[&str]| FormItem {
            id: id.to_string(),
            title: title.to_string(),
            status,
            submit_count_today: today,
            submit_count_total: total,
            last_updated: updated.to_string(),
            channels: channels.iter().map(|c| c.to_string()).collect(),
        };
        FormCatalog {
            forms: vec![
                form("F001", "秋季助学金申请表", FormStatus::Active, 12, 5300, "2023-10-24 10:00", &["app", "qr"]),
                form("F002", "临时困难救助登记", FormStatus::Draft, 0, 0, "2023-10-23 16:30", &[]),
                form("F003", "志愿者招募报名", FormStatus::Ended, 0, 128, "2023-09-15 09:00", &["qr"]),
                form("F004", "物资发放签收单", FormStatus::Active, 45, 1250, "2023-10-24 08:15", &["app"]),
            ],
        }
    }

    pub fn list_forms(&self) -> &[FormItem] {
        &self.forms
    }

    pub fn get(&self, id: &str) -> Option<&FormItem> {
        self.forms.iter().find(|f| f.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&FormItem, ServiceError> {
        self.get(id)
            .ok_or_else(|| ServiceError::FormNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog() {
        let catalog = FormCatalog::seeded();
        assert_eq!(catalog.list_forms().len(), 4);
        let form = catalog.get("F003").unwrap();
        assert_eq!(form.status, FormStatus::Ended);
        assert_eq!(form.submit_count_total, 128);
        assert!(catalog.get("F009").is_none());
        assert!(matches!(
            catalog.require("F009"),
            Err(ServiceError::FormNotFound(_))
        ));
    }
}
