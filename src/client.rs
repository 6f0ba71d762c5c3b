//! Client ("brand") records.
//!
//! Clients are a filter dimension for tasks and supply display names for the board.
//! Each one also carries a markdown wiki page and a list of useful links.

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, FlowResult};
use crate::task::blank_as_none;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientLink {
    pub id: String,
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(
        rename = "cover_url",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub wiki: String,
    #[serde(default)]
    pub links: Vec<ClientLink>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Client {
    /// A newly registered brand with a starter wiki page.
    pub fn new(id: String, name: &str) -> Self {
        Client {
            id,
            name: name.trim().to_string(),
            logo: None,
            cover_url: None,
            description: "New brand registered in the workspace.".to_string(),
            wiki: "# Brand Wiki\n\nStart documenting this brand's guidelines and key information here."
                .to_string(),
            links: Vec::new(),
            tags: vec!["New Brand".to_string()],
        }
    }

    pub fn add_link(&mut self, id: String, label: &str, url: &str) {
        self.links.push(ClientLink { id, label: label.to_string(), url: url.to_string() });
    }

    /// Remove a link by id or case-insensitive label.
    pub fn remove_link(&mut self, key: &str) -> FlowResult<ClientLink> {
        let pos = self
            .links
            .iter()
            .position(|l| l.id == key || l.label.eq_ignore_ascii_case(key))
            .ok_or_else(|| FlowError::LinkNotFound(key.to_string()))?;
        Ok(self.links.remove(pos))
    }
}

/// Split a `label=url` argument. Both halves must be non-empty.
pub fn parse_link_arg(arg: &str) -> FlowResult<(String, String)> {
    match arg.split_once('=') {
        Some((label, url)) if !label.trim().is_empty() && !url.trim().is_empty() => {
            Ok((label.trim().to_string(), url.trim().to_string()))
        }
        _ => Err(FlowError::InvalidLink(arg.to_string())),
    }
}

/// Display name for a client id, if the client still exists.
pub fn client_name<'a>(clients: &'a [Client], id: &str) -> Option<&'a str> {
    clients.iter().find(|c| c.id == id).map(|c| c.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_name_lookup() {
        let clients = vec![
            Client::new("1".into(), "TechFlow Solutions"),
            Client::new("2".into(), " Green Garden Co. "),
        ];
        assert_eq!(client_name(&clients, "1"), Some("TechFlow Solutions"));
        assert_eq!(client_name(&clients, "2"), Some("Green Garden Co."));
        assert_eq!(client_name(&clients, "9"), None);
    }

    #[test]
    fn test_new_client_defaults() {
        let c = Client::new("c1".into(), "Acme");
        assert_eq!(c.tags, vec!["New Brand".to_string()]);
        assert!(c.wiki.starts_with("# Brand Wiki"));
        assert!(c.links.is_empty());
    }

    #[test]
    fn test_deserialize_with_links() {
        let json = r#"{"id":"1","name":"TechFlow","logo":"https://img.test/t.png","links":[{"id":"l1","label":"Site","url":"https://techflow.test"}],"tags":["SaaS"]}"#;
        let c: Client = serde_json::from_str(json).unwrap();
        assert_eq!(c.links.len(), 1);
        assert_eq!(c.links[0].label, "Site");
        assert_eq!(c.cover_url, None);
        assert_eq!(c.description, "");
    }

    #[test]
    fn test_cover_url_keeps_snake_case_key() {
        let json = r#"{"id":"1","name":"TechFlow","cover_url":"https://img.test/cover.jpg"}"#;
        let c: Client = serde_json::from_str(json).unwrap();
        assert_eq!(c.cover_url.as_deref(), Some("https://img.test/cover.jpg"));
        let out = serde_json::to_string(&c).unwrap();
        assert!(out.contains("\"cover_url\""));
        assert!(!out.contains("coverUrl"));
    }

    #[test]
    fn test_parse_link_arg() {
        assert_eq!(
            parse_link_arg("Site = https://a.test/x?q=1").unwrap(),
            ("Site".to_string(), "https://a.test/x?q=1".to_string())
        );
        assert!(matches!(parse_link_arg("no-url"), Err(FlowError::InvalidLink(_))));
        assert!(matches!(parse_link_arg("=https://a.test"), Err(FlowError::InvalidLink(_))));
    }

    #[test]
    fn test_remove_link_by_id_or_label() {
        let mut c = Client::new("1".into(), "Acme");
        c.add_link("l1".into(), "Site", "https://acme.test");
        c.add_link("l2".into(), "Drive", "https://drive.test");
        assert_eq!(c.remove_link("drive").unwrap().id, "l2");
        assert_eq!(c.remove_link("l1").unwrap().label, "Site");
        assert!(matches!(c.remove_link("l1"), Err(FlowError::LinkNotFound(_))));
    }
}
