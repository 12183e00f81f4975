use crate::foundation::core::{ImageRef, MAX_SCALE, MIN_SCALE, Point, Size, Vec2};
use crate::foundation::error::{CanvasError, CanvasResult};
use crate::model::canvas::CanvasTransform;
use crate::model::overlay::{Overlay, OverlayStack};
use crate::model::session::Session;

/// Persisted session layout. Field names are part of the stored format.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionBlob {
    image: ImageRef,
    #[serde(default)]
    overlays: Vec<OverlayBlob>,
    #[serde(default)]
    annotations: Vec<serde_json::Value>,
    scale: f64,
    translate_x: f64,
    translate_y: f64,
    flip: bool,
    invert: bool,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct OverlayBlob {
    x: f64,
    y: f64,
    scale: f64,
    rotation: f64,
    width: f64,
    height: f64,
    src: ImageRef,
}

/// Encode the whole session as a self-contained JSON string.
///
/// The selection and any in-flight gesture are not part of the blob.
pub fn snapshot(session: &Session) -> CanvasResult<String> {
    let canvas = &session.canvas;
    let blob = SessionBlob {
        image: session.base_image.clone(),
        overlays: session
            .overlays
            .iter()
            .map(|o| OverlayBlob {
                x: o.position.x,
                y: o.position.y,
                scale: o.scale(),
                rotation: o.rotation_degrees,
                width: o.native_size().width,
                height: o.native_size().height,
                src: o.image().clone(),
            })
            .collect(),
        annotations: session.annotations.clone(),
        scale: canvas.scale(),
        translate_x: canvas.translate.x,
        translate_y: canvas.translate.y,
        flip: canvas.flipped,
        invert: canvas.inverted,
    };
    serde_json::to_string(&blob).map_err(|e| CanvasError::serde(format!("encode session: {e}")))
}

/// Decode a blob produced by [`snapshot`] into a complete new session.
///
/// Nothing is returned until every field has been validated, so callers can swap the result in
/// wholesale. Out-of-range scales are clamped; non-finite numbers are rejected.
pub fn restore(blob: &str) -> CanvasResult<Session> {
    let blob: SessionBlob = serde_json::from_str(blob)
        .map_err(|e| CanvasError::serde(format!("decode session: {e}")))?;

    let translate = Vec2::new(
        finite("translateX", blob.translate_x)?,
        finite("translateY", blob.translate_y)?,
    );
    let canvas = CanvasTransform::from_parts(
        translate,
        checked_scale("scale", blob.scale)?,
        blob.flip,
        blob.invert,
    );

    let mut overlays = Vec::with_capacity(blob.overlays.len());
    for (i, o) in blob.overlays.into_iter().enumerate() {
        let width = finite("overlay width", o.width)?;
        let height = finite("overlay height", o.height)?;
        if width < 0.0 || height < 0.0 {
            return Err(CanvasError::validation(format!(
                "overlay {i} has a negative size"
            )));
        }
        overlays.push(Overlay::from_parts(
            o.src,
            Size::new(width, height),
            Point::new(finite("overlay x", o.x)?, finite("overlay y", o.y)?),
            checked_scale("overlay scale", o.scale)?,
            finite("overlay rotation", o.rotation)?,
        ));
    }

    Ok(Session {
        base_image: blob.image,
        canvas,
        overlays: OverlayStack::from_overlays(overlays),
        annotations: blob.annotations,
    })
}

fn finite(field: &str, v: f64) -> CanvasResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CanvasError::validation(format!("{field} must be finite")))
    }
}

fn checked_scale(field: &str, v: f64) -> CanvasResult<f64> {
    let v = finite(field, v)?;
    if !(MIN_SCALE..=MAX_SCALE).contains(&v) {
        tracing::warn!(field, value = v, "stored scale out of range, clamping");
    }
    Ok(v.clamp(MIN_SCALE, MAX_SCALE))
}

#[cfg(test)]
#[path = "../../tests/unit/persist/blob.rs"]
mod tests;
