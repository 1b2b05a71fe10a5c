// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::keys::{AnnouncementId, GalleryId, SettingsId};
use crate::record::{Collection, Record};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    #[default]
    Landscape,
    Portrait,
}

/// News item shown on the home page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub description: String,
    #[serde(rename = "image")]
    pub media_url: String,
    #[serde(rename = "media_type")]
    pub media_kind: MediaKind,
    #[serde(rename = "aspect_ratio")]
    pub aspect: Aspect,
    pub date: String,
}

impl Record for Announcement {
    const COLLECTION: Collection = Collection::Announcements;

    type Key = AnnouncementId;

    fn key(&self) -> AnnouncementId {
        self.id
    }

    fn set_key(&mut self, key: AnnouncementId) {
        self.id = key;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: GalleryId,
    pub title: String,
    pub description: String,
    pub url: String,
}

impl Record for GalleryItem {
    const COLLECTION: Collection = Collection::Gallery;

    type Key = GalleryId;

    fn key(&self) -> GalleryId {
        self.id
    }

    fn set_key(&mut self, key: GalleryId) {
        self.id = key;
    }
}

/// Site-wide contact details. There is only ever one of these, stored under
/// [`SettingsId::CONTACT`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSettings {
    pub phone1: String,
    pub phone2: String,
    pub email: String,
    pub address: String,
    pub facebook: String,
    pub website: String,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            phone1: String::new(),
            phone2: String::new(),
            email: String::new(),
            address: String::new(),
            facebook: "#".into(),
            website: "#".into(),
        }
    }
}

impl Record for ContactSettings {
    const COLLECTION: Collection = Collection::Settings;

    type Key = SettingsId;

    fn key(&self) -> SettingsId {
        SettingsId::CONTACT
    }

    fn set_key(&mut self, _key: SettingsId) {}
}
