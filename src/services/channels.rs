//! Distribution channels of a published form.

use super::error::ServiceError;
use fake::Dummy;
use log::*;
use rand::Rng;

/// Share link host used when the configuration does not name one.
pub const DEFAULT_SHARE_BASE_URL: &str = "https://app.example.com/s";

/// Form id used in share links of forms that were never saved.
pub const FALLBACK_FORM_ID: &str = "F001";

const TAG_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Defines channel data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub views: u32,
    pub submissions: u32,
    pub create_time: String,
    pub active: bool,
    pub is_system: bool,
}

impl Channel {
    pub fn status_label(&self) -> &'static str {
        if self.active {
            "Active"
        } else {
            "Disabled"
        }
    }
}

/// Oversees the channel list of the publish screen.
///
#[derive(Clone, Debug)]
pub struct ChannelStore {
    channels: Vec<Channel>,
    next_seq: u32,
}

impl Default for ChannelStore {
    fn default() -> Self {
        ChannelStore::seeded()
    }
}

/// Generate a random channel tag: `ch_` followed by six lowercase
/// alphanumerics.
///
pub fn generate_tag() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| TAG_CHARSET[rng.gen_range(0..TAG_CHARSET.len())] as char)
        .collect();
    format!("ch_{}", suffix)
}

/// Build the share link of a channel.
///
pub fn share_link(base_url: &str, form_id: Option<&str>, tag: &str) -> String {
    format!(
        "{}/{}?ch={}",
        base_url.trim_end_matches('/'),
        form_id.unwrap_or(FALLBACK_FORM_ID),
        tag
    )
}

impl ChannelStore {
    pub fn new(channels: Vec<Channel>) -> Self {
        ChannelStore {
            next_seq: channels.len() as u32 + 1,
            channels,
        }
    }

    /// Return a store holding the two system channels and one poster channel.
    ///
    pub fn seeded() -> Self {
        let channel = |id: &str, name: &str, tag: &str, views, submissions, date: &str, active, is_system| {
            Channel {
                id: id.to_string(),
                name: name.to_string(),
                tag: tag.to_string(),
                views,
                submissions,
                create_time: date.to_string(),
                active,
                is_system,
            }
        };
        ChannelStore::new(vec![
            channel("sys_app", "申领项目表单 (App端)", "sys_app_entry", 1250, 560, "2023-01-01", true, true),
            channel("sys_public", "调查问卷 (公共链接)", "sys_public_link", 3400, 1205, "2023-01-01", false, true),
            channel("C01", "A栋大厅海报", "ch_auto_x8d", 1250, 342, "2023-10-01", true, false),
        ])
    }

    pub fn list_channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn system_channels(&self) -> Vec<&Channel> {
        self.channels.iter().filter(|c| c.is_system).collect()
    }

    pub fn custom_channels(&self) -> Vec<&Channel> {
        self.channels.iter().filter(|c| !c.is_system).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// Flip a channel between active and disabled. Returns the new state.
    ///
    pub fn toggle_channel(&mut self, id: &str) -> Result<bool, ServiceError> {
        let channel = self
            .channels
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::ChannelNotFound(id.to_string()))?;
        channel.active = !channel.active;
        info!("Channel {} is now {}", id, channel.status_label());
        Ok(channel.active)
    }

    /// Create an active custom channel with a pre-generated tag.
    ///
    pub fn create_channel(&mut self, name: &str, tag: String) -> Result<&Channel, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::EmptyName("Channel name"));
        }
        let id = loop {
            let id = format!("C{:02}", self.next_seq);
            self.next_seq += 1;
            if self.get(&id).is_none() {
                break id;
            }
        };
        info!("Created channel '{}' with tag {}", name, tag);
        self.channels.push(Channel {
            id: id.clone(),
            name: name.to_string(),
            tag,
            views: 0,
            submissions: 0,
            create_time: chrono::Local::now().format("%Y-%m-%d").to_string(),
            active: true,
            is_system: false,
        });
        self.channels
            .last()
            .ok_or(ServiceError::ChannelNotFound(id))
    }

    /// Delete a custom channel. Confirmation is the caller's concern.
    ///
    pub fn delete_channel(&mut self, id: &str) -> Result<Channel, ServiceError> {
        let pos = self
            .channels
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ServiceError::ChannelNotFound(id.to_string()))?;
        if self.channels[pos].is_system {
            warn!("Refusing to delete system channel {}", id);
            return Err(ServiceError::SystemChannel(id.to_string()));
        }
        info!("Deleted channel {}", id);
        Ok(self.channels.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    #[test]
    fn test_seeded_channels() {
        let store = ChannelStore::seeded();
        assert_eq!(store.system_channels().len(), 2);
        assert_eq!(store.custom_channels().len(), 1);
        assert!(!store.get("sys_public").unwrap().active);
    }

    #[test]
    fn test_generate_tag() {
        for _ in 0..20 {
            let tag = generate_tag();
            assert!(tag.starts_with("ch_"));
            assert_eq!(tag.len(), 9);
            assert!(tag[3..]
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_toggle_channel() {
        let mut store = ChannelStore::seeded();
        assert!(store.toggle_channel("sys_public").unwrap());
        assert!(!store.toggle_channel("sys_public").unwrap());
        assert!(matches!(
            store.toggle_channel("missing"),
            Err(ServiceError::ChannelNotFound(_))
        ));
    }

    #[test]
    fn test_create_channel() {
        let mut store = ChannelStore::seeded();
        let name: String = Faker.fake();
        let name = format!("海报 {}", name);
        let created = store.create_channel(&name, generate_tag()).unwrap();
        assert!(created.active);
        assert_eq!(created.views, 0);
        assert_eq!(created.name, name.trim());
        assert_eq!(store.custom_channels().len(), 2);

        assert!(matches!(
            store.create_channel("  ", generate_tag()),
            Err(ServiceError::EmptyName(_))
        ));
        assert_eq!(store.list_channels().len(), 4);
    }

    #[test]
    fn test_delete_channel() {
        let mut store = ChannelStore::seeded();
        assert!(matches!(
            store.delete_channel("sys_app"),
            Err(ServiceError::SystemChannel(_))
        ));
        let removed = store.delete_channel("C01").unwrap();
        assert_eq!(removed.tag, "ch_auto_x8d");
        assert!(store.custom_channels().is_empty());
    }

    #[test]
    fn test_generated_channels_are_independent() {
        let channels: Vec<Channel> = (0..3)
            .map(|i| {
                let mut channel: Channel = Faker.fake();
                channel.id = format!("X{}", i);
                channel.is_system = false;
                channel
            })
            .collect();
        let mut store = ChannelStore::new(channels);
        store.delete_channel("X1").unwrap();
        assert_eq!(store.list_channels().len(), 2);
        assert!(store.get("X0").is_some());
    }

    #[test]
    fn test_share_link() {
        assert_eq!(
            share_link(DEFAULT_SHARE_BASE_URL, Some("F004"), "ch_abc123"),
            "https://app.example.com/s/F004?ch=ch_abc123"
        );
        assert_eq!(
            share_link("https://forms.local/s/", None, "sys_app_entry"),
            "https://forms.local/s/F001?ch=sys_app_entry"
        );
    }
}
