/// PipDice Web - wasm bindings over the dice engine
///
/// The browser owns rendering and label rasterization. This module hands it
/// die geometry, per-face label placements and settle orientations as flat
/// float arrays, which cross the wasm boundary without extra glue.

use log::debug;
use nalgebra::UnitQuaternion;
use pipdice_core::{build_die, Die, LabelCache, LabelImageGenerator, LabelStyle, Rgb};
use wasm_bindgen::prelude::*;

/// Label images are drawn in JavaScript, keyed by value and style
struct BrowserLabels;

impl LabelImageGenerator for BrowserLabels {
    type Image = ();

    fn generate(&mut self, _value: u32, _style: LabelStyle) -> Self::Image {}
}

fn quaternion_array(q: &UnitQuaternion<f32>) -> Vec<f32> {
    let q = q.quaternion();
    vec![q.i, q.j, q.k, q.w]
}

#[wasm_bindgen]
pub struct WebDie {
    die: Die<()>,
}

#[wasm_bindgen]
impl WebDie {
    /// Build a die. `color` is `#rrggbb`; `dots` selects pip labels.
    #[wasm_bindgen(constructor)]
    pub fn new(sides: u32, color: &str, dots: bool) -> Result<WebDie, JsValue> {
        let color = Rgb::from_hex(color).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let style = if dots { LabelStyle::Dots } else { LabelStyle::Number };
        let mut labels = LabelCache::new(BrowserLabels);
        let die = build_die(sides, color, style, &mut labels).map_err(|e| JsValue::from_str(&e.to_string()))?;
        debug!("web die d{sides} ready");
        Ok(WebDie { die })
    }

    pub fn sides(&self) -> u32 {
        self.die.sides()
    }

    /// Whether roll results map onto mesh faces
    pub fn labeled(&self) -> bool {
        self.die.is_labeled()
    }

    /// Triangle soup positions, nine floats per triangle
    pub fn positions(&self) -> Vec<f32> {
        self.die
            .mesh()
            .triangles()
            .flat_map(|t| t.vertices)
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }

    /// Display value of each face, in face order
    pub fn face_numbers(&self) -> Vec<u32> {
        self.die.numbers().to_vec()
    }

    /// Eight floats per label: value, position xyz, rotation xyzw
    pub fn label_placements(&self) -> Vec<f32> {
        self.die
            .labels()
            .iter()
            .flat_map(|label| {
                let mut row = vec![label.value as f32, label.position.x, label.position.y, label.position.z];
                row.extend(quaternion_array(&label.rotation));
                row
            })
            .collect()
    }

    /// Settle orientation `[x, y, z, w]` for `value`, or `undefined` when the
    /// die cannot show it (use a random orientation instead)
    pub fn orientation(&self, value: u32) -> Option<Vec<f32>> {
        self.die.resolve_orientation(value).map(|q| quaternion_array(&q))
    }

    /// Value facing the viewer for a die rotated by `[x, y, z, w]`
    pub fn value_facing(&self, x: f32, y: f32, z: f32, w: f32) -> Option<u32> {
        let rotation = UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(w, x, y, z));
        self.die.face_facing(&rotation)
    }
}
