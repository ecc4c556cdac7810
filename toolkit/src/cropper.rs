//! Grid croppers
//!
//! A frame is a `Seq` of row `Seq`s. Cropping is pure coordinate
//! bookkeeping: slice the rows to the region's vertical extent and each
//! row to its horizontal extent, clamping to the frame bounds. An unset
//! end coordinate crops to the end of the axis.

use toolgraph_core::{Args, Region, RegionDependent, Result, SharedCache, Tool, ToolError, Value};

fn slice(items: &[Value], start: i64, end: Option<i64>) -> Vec<Value> {
    let len = items.len();
    let start = start.clamp(0, len as i64) as usize;
    let end = match end {
        Some(e) => e.clamp(start as i64, len as i64) as usize,
        None => len,
    };
    items[start..end].to_vec()
}

/// Crop a grid value to a region.
pub fn crop(frame: &Value, region: &Region) -> Result<Value> {
    let rows = frame.as_seq().ok_or(ToolError::TypeMismatch {
        expected: "seq of rows",
        found: frame.kind(),
    })?;
    let rows = slice(rows, region.y_start, region.y_end);
    let mut cropped = Vec::with_capacity(rows.len());
    for row in &rows {
        let cells = row.as_seq().ok_or(ToolError::TypeMismatch {
            expected: "seq row",
            found: row.kind(),
        })?;
        cropped.push(Value::Seq(slice(cells, region.x_start, region.x_end)));
    }
    Ok(Value::Seq(cropped))
}

/// Stateless cropper: takes the frame and the region as positional
/// arguments on every invoke.
pub struct Cropper {
    name: String,
}

impl Cropper {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Tool for Cropper {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let frame = args.require_first()?;
        let region = args
            .positional
            .get(1)
            .and_then(Region::from_value)
            .ok_or(ToolError::MissingArgument("crop region"))?;
        crop(frame, &region)
    }
}

/// Cropper bound to a producer-cached region: `update` re-derives the
/// region from the shared position cache, `invoke` reads only that
/// cached region. Invoking before any update is an error, since the
/// cache contract makes no promise until then.
pub struct RegionCropper {
    name: String,
    dependent: RegionDependent,
}

impl RegionCropper {
    pub fn new(name: impl Into<String>, manager: SharedCache, key: impl Into<String>) -> Self {
        let name = name.into();
        let dependent = RegionDependent::new(format!("{name}-region"), manager, key);
        Self { name, dependent }
    }

    pub fn region(&self) -> Option<Region> {
        self.dependent.region()
    }
}

impl Tool for RegionCropper {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&mut self, args: &Args) -> Result<Value> {
        let frame = args.require_first()?;
        let region = self.dependent.region().ok_or_else(|| {
            ToolError::leaf(format!(
                "no region cached for '{}'; update the graph first",
                self.dependent.key()
            ))
        })?;
        crop(frame, &region)
    }

    fn update(&mut self, args: &Args) -> Result<()> {
        self.dependent.update(args)
    }
}
