//! File import through the session.

use kurbo::Point;
use lienzo_core::shapes::Shape;
use lienzo_core::{DocumentObserver, EditorSession, SessionError};
use std::cell::RefCell;
use std::io::{Cursor, Write};
use std::rc::Rc;

struct Messages(Rc<RefCell<Vec<String>>>);

impl DocumentObserver for Messages {
    fn status(&mut self, message: &str) {
        self.0.borrow_mut().push(message.to_string());
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn svg_file_is_imported_as_group() {
    let mut file = tempfile::Builder::new().suffix(".svg").tempfile().unwrap();
    write!(
        file,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
            <rect x="10" y="10" width="30" height="20" fill="#ff0000"/>
            <circle cx="70" cy="70" r="10"/>
        </svg>"##
    )
    .unwrap();

    let mut session = EditorSession::default();
    let id = pollster::block_on(session.import_file(file.path())).unwrap();

    let doc = session.document();
    let Some(Shape::Group(group)) = doc.get(&id) else {
        panic!("expected a group");
    };
    assert_eq!(group.children().len(), 2);
    assert_eq!(session.selection(), &[id.clone()]);
    assert_eq!(session.history().len(), 2);

    // Small content is centered, not scaled
    let bounds = doc.get(&id).unwrap().bounds();
    assert!((bounds.width() - 70.0).abs() < 1e-6);
    assert!((bounds.center() - Point::new(400.0, 300.0)).hypot() < 1e-6);
}

#[test]
fn oversized_raster_is_scaled_to_fit() {
    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(&png_bytes(1600, 600)).unwrap();

    let messages = Rc::new(RefCell::new(Vec::new()));
    let mut session = EditorSession::default();
    session.add_observer(Box::new(Messages(messages.clone())));
    let id = pollster::block_on(session.import_file(file.path())).unwrap();

    assert_eq!(id.as_str(), "Objeto-1");
    let bounds = session.document().get(&id).unwrap().bounds();
    // min(800/1600, 600/600) * 0.8 = 0.4
    assert!((bounds.width() - 640.0).abs() < 1e-6);
    assert!((bounds.height() - 240.0).abs() < 1e-6);

    let name = file.path().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(
        messages.borrow().last().cloned(),
        Some(format!("Imagen cargada correctamente: {name}"))
    );
}

#[test]
fn broken_file_leaves_document_untouched() {
    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(&[0x89, b'P', b'N', b'G', 0, 0, 0, 0]).unwrap();

    let mut session = EditorSession::default();
    let result = pollster::block_on(session.import_file(file.path()));
    assert!(matches!(result, Err(SessionError::Import(_))));
    assert!(session.document().is_empty());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = EditorSession::default();
    let result = pollster::block_on(session.import_file(&dir.path().join("nada.svg")));
    assert!(matches!(result, Err(SessionError::Import(_))));
}
