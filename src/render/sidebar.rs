use serde::Serialize;

use super::round_percent;
use crate::models::Device;

/// Mini usage bar under a sidebar row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    /// Fill width in percent of the row; the rounded usage, unclamped.
    pub fill_percent: i64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarRow {
    /// Sent back by the client as the selection when the row is clicked.
    pub id: String,
    pub label: String,
    pub usage: i64,
    pub usage_text: String,
    pub sub: String,
    pub bar: Bar,
    pub active: bool,
}

pub fn sidebar(devices: &[Device], selected: Option<&str>) -> Vec<SidebarRow> {
    devices
        .iter()
        .map(|d| {
            let usage = round_percent(d.val);
            SidebarRow {
                id: d.id.clone(),
                label: d.label.clone(),
                usage,
                usage_text: format!("{usage}%"),
                sub: d.sub.clone(),
                bar: Bar {
                    fill_percent: usage,
                    color: d.kind.accent(),
                },
                active: selected == Some(d.id.as_str()),
            }
        })
        .collect()
}
