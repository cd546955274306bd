use crate::foundation::{
    core::{Motion, Position},
    error::{DwellError, DwellResult},
};

/// One authoritative keyframe for one entity. Immutable once parsed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    /// Observation time in seconds.
    pub t_sec: f64,
    /// Degrees in `[0, 360)`.
    #[serde(default)]
    pub angle_deg: Option<f64>,
    /// Normalized distance from center.
    #[serde(default)]
    pub radius_factor: Option<f64>,
    /// Authoritative motion for the interval this sample opens.
    #[serde(default)]
    pub motion_label: Option<Motion>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Sample {
    /// A bare keyframe at `t_sec` with a known position.
    pub fn at(t_sec: f64, angle_deg: f64, radius_factor: f64) -> Self {
        Self {
            t_sec,
            angle_deg: Some(angle_deg),
            radius_factor: Some(radius_factor),
            motion_label: None,
            notes: None,
        }
    }

    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion_label = Some(motion);
        self
    }

    /// Both coordinates, when present.
    pub fn position(&self) -> Option<Position> {
        Some(Position {
            angle_deg: self.angle_deg?,
            radius_factor: self.radius_factor?,
        })
    }
}

/// Ordered keyframes for one entity, non-decreasing in `t_sec`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Track {
    samples: Vec<Sample>,
}

impl Track {
    /// Build from samples in any order. The sort is stable, so equal times keep input order.
    pub fn from_unsorted(mut samples: Vec<Sample>) -> Self {
        samples.sort_by(|a, b| a.t_sec.total_cmp(&b.t_sec));
        Self { samples }
    }

    /// Append a live sample. Samples may not go back in time.
    pub fn push(&mut self, sample: Sample) -> DwellResult<()> {
        if !sample.t_sec.is_finite() {
            return Err(DwellError::validation("sample time must be finite"));
        }
        if let Some(last) = self.samples.last()
            && sample.t_sec < last.t_sec
        {
            return Err(DwellError::validation(format!(
                "sample at {}s is earlier than the track end at {}s",
                sample.t_sec, last.t_sec
            )));
        }
        self.samples.push(sample);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Interpolation and classification need two samples.
    pub fn is_classifiable(&self) -> bool {
        self.samples.len() >= 2
    }

    /// `(first, last)` sample times.
    pub fn span(&self) -> Option<(f64, f64)> {
        Some((self.first()?.t_sec, self.last()?.t_sec))
    }
}

/// One row of a keyframe table before validation.
///
/// Every field is kept as text so that a bad cell only disqualifies its own row. JSON rows may
/// carry numbers or strings interchangeably.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    #[serde(default, deserialize_with = "lenient_text")]
    pub person_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub t_sec: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub angle_deg: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub radius_factor: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub bench: Option<String>,
    /// `Some("")` when the field is present but empty or null.
    #[serde(default, deserialize_with = "present_text")]
    pub motion: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
}

fn lenient_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = <serde_json::Value as serde::Deserialize>::deserialize(de)?;
    Ok(match v {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    })
}

/// Like [`lenient_text`], but a present `null` stays distinguishable from a missing key.
fn present_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Some(lenient_text(de)?.unwrap_or_default()))
}

#[cfg(test)]
#[path = "../../tests/unit/samples/model.rs"]
mod tests;
