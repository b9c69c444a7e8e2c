use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::gate::{Authorization, AuthorizationReply};
use crate::media::{Asset, MediaType};

use super::AssetSource;

/// Asset list exported from an asset store as JSON.
///
/// ```json
/// {
///   "authorized": true,
///   "assets": [
///     { "id": "A1", "mediaType": 1, "creationDate": "2021-09-12T10:00:00Z",
///       "resources": [{ "fileSize": 5242880 }] }
///   ]
/// }
/// ```
///
/// Fields are read leniently: a value of the wrong shape counts as absent,
/// and an unrecognized media type becomes `missing`.
pub struct CatalogSource {
    name: String,
    catalog: Catalog,
}

#[derive(Debug, Deserialize)]
struct Catalog {
    #[serde(default = "default_authorized")]
    authorized: bool,
    #[serde(default)]
    assets: Vec<CatalogEntry>,
}

fn default_authorized() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    media_type: Value,
    #[serde(default)]
    creation_date: Value,
    #[serde(default)]
    resources: Vec<CatalogResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogResource {
    #[serde(default)]
    file_size: Value,
}

impl CatalogSource {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("opening catalog {}", path.display()))?;
        let catalog: Catalog = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        Ok(Self {
            name: path.display().to_string(),
            catalog,
        })
    }

    pub fn from_slice(name: &str, bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(Self {
            name: name.to_string(),
            catalog: serde_json::from_slice(bytes)?,
        })
    }
}

fn media_type_of(value: &Value) -> MediaType {
    match value {
        Value::Number(n) => n.as_i64().map_or(MediaType::Missing, MediaType::from_raw),
        Value::String(s) => MediaType::from_name(s),
        _ => MediaType::Missing,
    }
}

/// RFC 3339 text or Unix seconds.
fn creation_date_of(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| d.with_timezone(&Utc))
            .ok(),
        Value::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}

impl AssetSource for CatalogSource {
    fn describe(&self) -> String {
        format!("catalog {}", self.name)
    }

    fn request_authorization(&self, reply: AuthorizationReply) {
        reply(if self.catalog.authorized {
            Authorization::Granted
        } else {
            Authorization::Denied
        });
    }

    fn list_assets(&self) -> anyhow::Result<Vec<Asset>> {
        let assets: Vec<Asset> = self
            .catalog
            .assets
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let origin = entry.id.clone().unwrap_or_else(|| format!("#{}", i));
                let date = creation_date_of(&entry.creation_date);
                if date.is_none() && !entry.creation_date.is_null() {
                    warn!("{}: unreadable creationDate {}", origin, entry.creation_date);
                }

                let mut asset = Asset::new(origin, media_type_of(&entry.media_type), date);
                for resource in &entry.resources {
                    asset = asset.with_resource(resource.file_size.as_u64());
                }
                asset
            })
            .collect();
        debug!("{} assets in {}", assets.len(), self.name);
        Ok(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::await_authorization;

    fn list(json: &str) -> Vec<Asset> {
        CatalogSource::from_slice("test", json.as_bytes())
            .unwrap()
            .list_assets()
            .unwrap()
    }

    #[test]
    fn test_fields() {
        let assets = list(
            r#"{"assets": [
                {"id": "a", "mediaType": 1, "creationDate": "2021-09-12T10:00:00+02:00",
                 "resources": [{"fileSize": 5242880}]},
                {"id": "b", "mediaType": "video", "creationDate": 0,
                 "resources": [{"fileSize": 10}, {"fileSize": 99}]},
                {"id": "c", "mediaType": 3}
            ]}"#,
        );
        assert_eq!(assets.len(), 3);

        assert_eq!(assets[0].media_type, MediaType::Image);
        assert_eq!(assets[0].creation_date.unwrap().to_rfc3339(), "2021-09-12T08:00:00+00:00");
        assert_eq!(assets[0].byte_size(), Some(5_242_880));

        assert_eq!(assets[1].media_type, MediaType::Video);
        assert_eq!(assets[1].creation_date, Some(DateTime::<Utc>::UNIX_EPOCH));
        assert_eq!(assets[1].byte_size(), Some(10));

        assert_eq!(assets[2].media_type, MediaType::Audio);
        assert!(assets[2].creation_date.is_none());
        assert_eq!(assets[2].byte_size(), None);
    }

    #[test]
    fn test_unrecognized_values_degrade() {
        let assets = list(
            r#"{"assets": [
                {"mediaType": 42, "creationDate": "yesterday", "resources": []},
                {"mediaType": true, "resources": [{"fileSize": -5}]},
                {"resources": [{}]}
            ]}"#,
        );
        assert_eq!(assets[0].media_type, MediaType::Missing);
        assert_eq!(assets[0].origin, "#0");
        assert!(assets[0].creation_date.is_none());
        assert_eq!(assets[0].byte_size(), None);

        assert_eq!(assets[1].media_type, MediaType::Missing);
        assert_eq!(assets[1].byte_size(), None);

        assert_eq!(assets[2].media_type, MediaType::Missing);
        assert_eq!(assets[2].byte_size(), None);
    }

    #[test]
    fn test_authorization_flag() {
        let open = CatalogSource::from_slice("open", br#"{"assets": []}"#).unwrap();
        assert_eq!(await_authorization(&open, None).unwrap(), Authorization::Granted);

        let locked = CatalogSource::from_slice("locked", br#"{"authorized": false, "assets": [{"mediaType": 1}]}"#)
            .unwrap();
        assert_eq!(await_authorization(&locked, None).unwrap(), Authorization::Denied);
        // listing does not consult the flag
        assert_eq!(locked.list_assets().unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_catalog_is_an_error() {
        assert!(CatalogSource::from_slice("bad", b"[1, 2").is_err());
    }
}
