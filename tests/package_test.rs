use folio::{
    ColorInput, ColorSpec, CreateOptions, Document, GeometricBounds, ShapeOptions, Sprite,
};
use tempfile::NamedTempFile;

fn new_document() -> Document {
    Document::create(CreateOptions {
        page_bounds: GeometricBounds::new(0.0, 0.0, 500.0, 500.0),
    })
    .expect("Failed to create document")
}

fn red() -> ColorSpec {
    ColorSpec::Value(ColorInput::Rgb {
        red: 255.0,
        green: 0.0,
        blue: 0.0,
    })
}

#[test]
fn test_create_export_reload_rectangle() {
    let mut doc = new_document();
    doc.create_rectangle(
        0,
        &ShapeOptions {
            bounds: GeometricBounds::new(20.0, 20.0, 120.0, 80.0),
            fill: Some(red()),
            ..Default::default()
        },
        None,
    )
    .expect("Failed to create rectangle");

    let bytes = doc.export().expect("Failed to export");
    let reloaded = Document::load(&bytes).expect("Failed to reload");

    let spread = reloaded.spread(0);
    assert_eq!(spread.root_sprites().len(), 1);
    let id = spread.root_sprites()[0];
    assert!(matches!(spread.sprite(id), Sprite::Rectangle(_)));

    let bounds = spread.geometric_bounds(id).expect("no bounds");
    assert_eq!(bounds, GeometricBounds::new(20.0, 20.0, 120.0, 80.0));

    let fill_id = spread.sprite(id).fill_color().expect("no fill");
    let color = reloaded.color_by_id(fill_id).expect("fill unresolvable");
    assert!(color.matches(&ColorInput::Rgb {
        red: 255.0,
        green: 0.0,
        blue: 0.0
    }));
}

#[test]
fn test_export_through_file() {
    let mut doc = new_document();
    doc.create_oval(
        0,
        &ShapeOptions {
            bounds: GeometricBounds::new(100.0, 100.0, 200.0, 100.0),
            fill: Some(red()),
            ..Default::default()
        },
        None,
    )
    .unwrap();

    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    std::fs::write(temp_file.path(), doc.export().unwrap()).expect("Failed to write");

    let bytes = std::fs::read(temp_file.path()).expect("Failed to read back");
    let reloaded = Document::load(&bytes).expect("Failed to reload");

    let spread = reloaded.spread(0);
    let id = spread.root_sprites()[0];
    assert!(matches!(spread.sprite(id), Sprite::Oval(_)));

    let ellipse = spread.ellipse(id).expect("no ellipse");
    assert_eq!(ellipse.x, 200.0);
    assert_eq!(ellipse.y, 150.0);
    assert_eq!(ellipse.radius_x, 100.0);
    assert_eq!(ellipse.radius_y, 50.0);
}

#[test]
fn test_roundtrip_preserves_untouched_entries() {
    let doc = new_document();
    let bytes = doc.export().unwrap();
    let reloaded = Document::load(&bytes).unwrap();

    // Export again without touching anything: the file lists agree
    let first: Vec<String> = doc.pack().unwrap().into_iter().map(|(p, _)| p).collect();
    let second: Vec<String> = reloaded.pack().unwrap().into_iter().map(|(p, _)| p).collect();
    assert_eq!(first, second);

    // The mimetype entry passes through byte-identical
    let packed = reloaded.pack().unwrap();
    let mimetype = packed.iter().find(|(p, _)| p == "mimetype").unwrap();
    assert_eq!(
        mimetype.1.as_slice(),
        b"application/vnd.adobe.indesign-idml-package"
    );
}

#[test]
fn test_nested_clip_wrapper_roundtrip() {
    let mut doc = new_document();
    // A polygon acting as clip wrapper around an image
    let wrapper = doc
        .create_polygon(
            0,
            &[
                folio::PathCommand::MoveTo { x: 0.0, y: 0.0 },
                folio::PathCommand::LineTo { x: 100.0, y: 0.0 },
                folio::PathCommand::LineTo { x: 50.0, y: 80.0 },
                folio::PathCommand::Close,
            ],
            &ShapeOptions::default(),
            None,
        )
        .unwrap();

    let png: Vec<u8> = {
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&[0, 0, 0, 13]);
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&64u32.to_be_bytes());
        data.extend_from_slice(&64u32.to_be_bytes());
        data
    };
    doc.create_image(
        0,
        &ShapeOptions {
            bounds: GeometricBounds::new(10.0, 10.0, 80.0, 60.0),
            ..Default::default()
        },
        Some(png.clone()),
        Some(wrapper),
    )
    .unwrap();

    let bytes = doc.export().unwrap();
    let reloaded = Document::load(&bytes).unwrap();
    let spread = reloaded.spread(0);

    assert_eq!(spread.root_sprites().len(), 1);
    let wrapper_id = spread.root_sprites()[0];
    let Sprite::Polygon(polygon) = spread.sprite(wrapper_id) else {
        panic!("expected polygon wrapper");
    };
    assert_eq!(polygon.children.len(), 1);

    let Sprite::Image(image) = spread.sprite(polygon.children[0]) else {
        panic!("expected nested image");
    };
    assert_eq!(image.contents.as_deref(), Some(png.as_slice()));
    assert_eq!(
        spread.geometric_bounds(polygon.children[0]).unwrap(),
        GeometricBounds::new(10.0, 10.0, 80.0, 60.0)
    );
}

#[test]
fn test_create_master_spread_and_instantiate() {
    let mut doc = new_document();
    let master_index = doc
        .create_master_spread(
            &folio::CreateMasterSpreadOptions {
                name: "B-Master".into(),
                name_prefix: "B".into(),
                base_name: "Master".into(),
            },
            0,
        )
        .unwrap();
    assert_eq!(doc.master_spreads.len(), 2);
    assert_eq!(doc.master_spreads[master_index].master.name, "B-Master");

    let spread_index = doc.create_spread(master_index).unwrap();
    let bytes = doc.export().unwrap();
    let reloaded = Document::load(&bytes).unwrap();
    assert_eq!(reloaded.spreads.len(), 2);
    assert_eq!(
        reloaded.spread(spread_index).page_origin(),
        [-250.0, -250.0]
    );
}

#[test]
fn test_transform_survives_roundtrip() {
    let mut doc = new_document();
    let id = doc
        .create_rectangle(
            0,
            &ShapeOptions {
                bounds: GeometricBounds::new(0.0, 0.0, 100.0, 100.0),
                ..Default::default()
            },
            None,
        )
        .unwrap();

    let pivot = [-200.0, -200.0];
    let transform = folio::Transform {
        translate_x: 30.0,
        translate_y: -10.0,
        scale_x: 2.0,
        scale_y: 2.0,
        rotate: 0.25,
    };
    doc.spread_mut(0).sprite_mut(id).set_transform(transform, pivot);

    let bytes = doc.export().unwrap();
    let reloaded = Document::load(&bytes).unwrap();
    let back = reloaded.spread(0).sprite(id).transform(pivot);

    assert!((back.translate_x - 30.0).abs() < 1e-6);
    assert!((back.translate_y + 10.0).abs() < 1e-6);
    assert!((back.scale_x - 2.0).abs() < 1e-6);
    assert!((back.rotate - 0.25).abs() < 1e-6);
}

#[test]
fn test_load_rejects_missing_manifest_entry() {
    let doc = new_document();
    let mut files = doc.pack().unwrap();
    // Drop a declared sub-package file
    files.retain(|(path, _)| !path.starts_with("Spreads/"));

    let mut entries = std::collections::BTreeMap::new();
    for (path, bytes) in files {
        entries.insert(path, bytes);
    }
    let result = Document::load_from_entries(entries);
    assert!(result.is_err(), "load must fail when a declared file is gone");
}

#[test]
fn test_load_rejects_missing_designmap() {
    let result = Document::load_from_entries(std::collections::BTreeMap::new());
    assert!(result.is_err());
}
