use crate::pipeline::AtlasOutput;
use serde_json::{Value, json};

/// Serialize tile placements as `{ frames: [...], meta }`.
///
/// Each frame carries the source grid position and both rectangles, which is
/// the only way to map tiles back to the source once reordering is on.
/// `image` is the file name stored in `meta.image`.
pub fn to_json(out: &AtlasOutput, image: &str) -> Value {
    let frames: Vec<Value> = out
        .placements
        .iter()
        .map(|p| {
            json!({
                "index": p.index,
                "col": p.col,
                "row": p.row,
                "source": {"x": p.source.x, "y": p.source.y, "w": p.source.w, "h": p.source.h},
                "frame": {"x": p.target.x, "y": p.target.y, "w": p.target.w, "h": p.target.h},
            })
        })
        .collect();
    let mut meta = json!(out.meta());
    if let Some(obj) = meta.as_object_mut() {
        obj.insert("image".into(), Value::String(image.to_string()));
    }
    json!({ "frames": frames, "meta": meta })
}
