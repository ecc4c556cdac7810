//! End-to-end pipeline: config-driven position mappers feed a producer
//! cache; croppers consume cached regions; combinators wire capture-like
//! sources, croppers, and labeling into one graph with a single
//! update/invoke lifecycle.

use serde_json::json;

use toolgraph_core::ops::{Chain, Extract, Fanout, Lambda, Spread, Variable};
use toolgraph_core::{
    Args, Config, ProducerCache, Settings, SharedConfig, Strategy, Tool, ToolHandle, ToolSet, Value,
};
use toolgraph_toolkit::{PositionMapper, RegionCropper};

fn shared_config(pairs: &[(&str, serde_json::Value)]) -> SharedConfig {
    let mut settings = Settings::new();
    for (key, value) in pairs {
        settings.set(*key, value.clone());
    }
    Config::new(settings).into_shared()
}

fn frame(height: i64, width: i64) -> Value {
    Value::Seq(
        (0..height)
            .map(|y| Value::Seq((0..width).map(|x| Value::Int(y * width + x)).collect()))
            .collect(),
    )
}

/// A capture-like leaf: always produces the same synthetic frame.
fn capture(name: &str, height: i64, width: i64) -> ToolHandle {
    let fixed = frame(height, width);
    ToolHandle::new(Lambda::new(name, move |_: &Args| Ok(fixed.clone())))
}

#[test]
fn cropper_reads_positions_derived_from_config() {
    let config = shared_config(&[("hp_x", json!(2)), ("hp_w", json!(3))]);

    let mapper = PositionMapper::new("hp_bar", config.clone())
        .field("x", |cfg| cfg.get_or("hp_x", 0))
        .field("y", |_| Value::Int(1))
        .field("w", |cfg| cfg.get_or("hp_w", 0))
        .field("h", |_| Value::Int(2));

    let manager = ProducerCache::new(ToolSet::from_handles(
        "positions",
        Strategy::Dict,
        vec![ToolHandle::new(mapper)],
    ))
    .into_shared();

    let mut cropper = RegionCropper::new("hp_crop", manager.clone(), "hp_bar");

    // Reading before any update is a contract violation and fails.
    assert!(cropper.invoke(&Args::of(frame(6, 8))).is_err());

    manager.borrow_mut().update(&Args::none()).unwrap();
    cropper.update(&Args::none()).unwrap();

    let cropped = cropper.invoke(&Args::of(frame(6, 8))).unwrap();
    let rows = cropped.as_seq().unwrap();
    assert_eq!(rows.len(), 2); // h = 2
    assert_eq!(rows[0].as_seq().unwrap().len(), 3); // w = 3
    // Row 1, columns 2..5 of the synthetic frame.
    assert_eq!(rows[0], Value::Seq(vec![Value::Int(10), Value::Int(11), Value::Int(12)]));
}

#[test]
fn config_reload_moves_the_region_after_one_update() {
    let config = shared_config(&[("x", json!(0)), ("w", json!(2))]);

    let mapper = PositionMapper::new("zone", config.clone())
        .from_config("x", 0)
        .from_config("w", 0)
        .field("y", |_| Value::Int(0))
        .field("h", |_| Value::Int(1));

    let manager = ProducerCache::new(ToolSet::from_handles(
        "positions",
        Strategy::Dict,
        vec![ToolHandle::new(mapper)],
    ))
    .into_shared();

    let mut cropper = RegionCropper::new("zone_crop", manager.clone(), "zone");
    manager.borrow_mut().update(&Args::none()).unwrap();
    cropper.update(&Args::none()).unwrap();

    let before = cropper.invoke(&Args::of(frame(1, 6))).unwrap();
    assert_eq!(
        before,
        Value::Seq(vec![Value::Seq(vec![Value::Int(0), Value::Int(1)])])
    );

    // Mutate the shared config in place, then update the graph.
    {
        let mut cfg = config.borrow_mut();
        cfg.settings_mut().set("x", json!(3));
    }
    manager.borrow_mut().update(&Args::none()).unwrap();
    cropper.update(&Args::none()).unwrap();

    let after = cropper.invoke(&Args::of(frame(1, 6))).unwrap();
    assert_eq!(
        after,
        Value::Seq(vec![Value::Seq(vec![Value::Int(3), Value::Int(4)])])
    );
}

#[test]
fn two_stream_pipeline_with_shared_capture() {
    let config = shared_config(&[("x", json!(1)), ("w", json!(2))]);

    let mapper = PositionMapper::new("zone", config)
        .from_config("x", 0)
        .from_config("w", 0)
        .field("y", |_| Value::Int(0))
        .field("h", |_| Value::Int(1));

    let manager = ProducerCache::new(ToolSet::from_handles(
        "positions",
        Strategy::Dict,
        vec![ToolHandle::new(mapper)],
    ))
    .into_shared();

    // One capture leaf shared by two streams through Variable.
    let source = capture("capture", 1, 5);
    let streams = Fanout::broadcast(
        "streams",
        vec![
            ToolHandle::new(Variable::new("stream_0", source.clone())),
            ToolHandle::new(Variable::new("stream_1", source)),
        ],
    );

    // Crop the first stream; label the second untouched.
    let crop_first = Chain::new(
        "crop_first",
        vec![
            ToolHandle::new(Extract::key("image_0")),
            ToolHandle::new(RegionCropper::new("crop", manager.clone(), "zone")),
        ],
    );
    let keep_second = Chain::new(
        "keep_second",
        vec![ToolHandle::new(Extract::key("image_1"))],
    );

    let mut pipeline = Chain::new(
        "pipeline",
        vec![
            ToolHandle::new(streams),
            ToolHandle::new(Spread::new("label", ["image_0", "image_1"])),
            ToolHandle::new(Fanout::broadcast(
                "crops",
                vec![ToolHandle::new(crop_first), ToolHandle::new(keep_second)],
            )),
            ToolHandle::new(Spread::new("relabel", ["cropped", "full"])),
        ],
    );

    manager.borrow_mut().update(&Args::none()).unwrap();
    pipeline.update(&Args::none()).unwrap();

    let result = pipeline.invoke(&Args::none()).unwrap();
    let cropped = result.get("cropped").unwrap().as_seq().unwrap();
    let full = result.get("full").unwrap().as_seq().unwrap();

    // The cropped stream is narrower than the full one.
    assert_eq!(cropped[0].as_seq().unwrap().len(), 2);
    assert_eq!(full[0].as_seq().unwrap().len(), 5);
    assert_eq!(
        cropped[0],
        Value::Seq(vec![Value::Int(1), Value::Int(2)])
    );
}
