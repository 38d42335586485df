//! End-to-end rendering scenarios through the public API.

use std::sync::Arc;

use reprkit::{
    impl_inspect, Field, FieldRenderer, LengthExtractor, Record, Registry, Render, ReprError,
    Sequencer, Stylized, TemplateFormatter, TypeDecl,
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Serialize)]
struct Point {
    a: i64,
    b: i64,
}
impl_inspect!(Point);

#[derive(Serialize)]
struct Playlist {
    title: String,
    tracks: Vec<String>,
    rating: u8,
}
impl_inspect!(Playlist);
impl Stylized for Playlist {}

#[test]
fn test_point_scenario() {
    let seq = Sequencer::default();
    let renderer = FieldRenderer::new(vec![
        Field::named("a").priority(1).build(&seq),
        Field::named("b").priority(2).build(&seq),
    ]);
    assert_eq!(renderer.render(&Point { a: 1, b: 2 }).unwrap(), "Point(a=1, b=2)");
}

#[test]
fn test_percentage_fragment() {
    let seq = Sequencer::default();
    let field = Field::named("x")
        .formatter(TemplateFormatter::new("{value}%"))
        .build(&seq);
    let obj = Record::new("Gauge").with("x", 42);
    assert_eq!(field.render_against(&obj).unwrap(), "42%");
}

#[test]
fn test_missing_attribute_fails_whole_render() {
    let seq = Sequencer::default();
    let renderer = FieldRenderer::new(vec![
        Field::named("a").build(&seq),
        Field::named("missing").build(&seq),
    ]);
    let err = renderer.render(&Point { a: 1, b: 2 }).unwrap_err();
    match err {
        ReprError::Extraction {
            type_name, field, ..
        } => {
            assert_eq!(type_name, "Point");
            assert_eq!(field, "missing");
        }
        other => panic!("expected extraction error, got {other:?}"),
    }
}

#[derive(Serialize)]
struct Board {
    size: u8,
    marks: HashMap<(u8, u8), char>,
}
impl_inspect!(Board);

#[test]
fn test_unserializable_instance_reports_serde_failure() {
    let seq = Sequencer::default();
    let renderer = FieldRenderer::new(vec![Field::named("size").build(&seq)]);
    let board = Board {
        size: 3,
        marks: HashMap::from([((1, 1), 'x')]),
    };
    let err = renderer.render(&board).unwrap_err();
    assert!(matches!(err, ReprError::Extraction { .. }));
    let message = err.to_string();
    assert!(message.contains("did not serialize"), "{message}");
    assert!(!message.contains("has no attribute"), "{message}");
}

#[test]
fn test_formatted_fragment_with_spec() {
    let seq = Sequencer::default();
    let renderer = FieldRenderer::new(vec![
        Field::named("a").build(&seq),
        Field::named("b")
            .formatter(TemplateFormatter::new("b≈{value:.1f}"))
            .build(&seq),
    ]);
    assert_eq!(renderer.render(&Point { a: 1, b: 2 }).unwrap(), "Point(a=1, b≈2.0)");
}

#[test]
fn test_empty_renderer_for_struct() {
    let renderer = FieldRenderer::new(Vec::<Arc<Field>>::new());
    assert_eq!(renderer.render(&Point { a: 0, b: 0 }).unwrap(), "Point()");
}

#[test_log::test]
fn test_stylized_struct_through_global_registry() {
    Registry::global()
        .define(
            TypeDecl::new("Playlist")
                .field(Field::named("title"))
                .field(Field::named("tracks").extractor(LengthExtractor))
                .field(
                    Field::named("rating")
                        .formatter(TemplateFormatter::new("{value}/5"))
                        .priority(0),
                ),
        )
        .unwrap();

    let playlist = Playlist {
        title: "Road trip".into(),
        tracks: vec!["one".into(), "two".into(), "three".into()],
        rating: 4,
    };
    assert_eq!(
        playlist.to_display_string().unwrap(),
        "Playlist(4/5, title=Road trip, tracks=3)"
    );
    assert_eq!(
        format!("{}", playlist.styled()),
        "Playlist(4/5, title=Road trip, tracks=3)"
    );
}
