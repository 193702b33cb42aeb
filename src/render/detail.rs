use serde::Serialize;

use super::{DrawOp, Surface, draw_graph, round_percent};
use crate::models::{Device, Stat};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub usage_text: String,
    pub usage_color: &'static str,
    pub stats: Vec<Stat>,
    pub graph: Vec<DrawOp>,
}

pub fn detail(device: &Device, history: &[f64], surface: &mut Surface) -> DetailView {
    let accent = device.kind.accent();
    DetailView {
        id: device.id.clone(),
        title: device.label.clone(),
        subtitle: device.sub.clone(),
        usage_text: format!("{}%", round_percent(device.val)),
        usage_color: accent,
        stats: device.stats.clone(),
        graph: draw_graph(surface, history, accent),
    }
}
