use chrono::Local;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use super::fonts::{encode_win_ansi, Font};
use super::{Element, PackingNote, A4_HEIGHT, A4_WIDTH};
use crate::errors::PacknoteError;

fn operations(element: &Element) -> Vec<Operation> {
    match element {
        Element::Text {
            text,
            font,
            size,
            x,
            y,
        } => vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(font.resource_name().as_bytes().to_vec()),
                    Object::Real(*size),
                ],
            ),
            Operation::new("Td", vec![Object::Real(*x), Object::Real(*y)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ],
        Element::Line { from, to, width } => vec![
            Operation::new("w", vec![Object::Real(*width)]),
            Operation::new("m", vec![Object::Real(from.0), Object::Real(from.1)]),
            Operation::new("l", vec![Object::Real(to.0), Object::Real(to.1)]),
            Operation::new("S", vec![]),
        ],
    }
}

fn font_resources(doc: &mut Document) -> Dictionary {
    let mut fonts = Dictionary::new();
    for font in Font::all() {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), Object::Reference(font_id));
    }
    fonts
}

fn text_string(s: &str) -> Object {
    Object::String(encode_win_ansi(s), StringFormat::Literal)
}

pub(super) fn render(note: &PackingNote) -> Result<Document, PacknoteError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let content = Content {
        operations: note.layout().iter().flat_map(operations).collect::<Vec<_>>(),
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    let fonts = font_resources(&mut doc);
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), Object::Real(A4_WIDTH), Object::Real(A4_HEIGHT)],
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(&note.title()),
        "Subject" => text_string(&note.details.name),
        "Producer" => text_string(concat!("packnote ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => text_string(&Local::now().format("D:%Y%m%d%H%M%S").to_string()),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Sender;
    use crate::ledgers::LedgerDetails;

    fn details() -> LedgerDetails {
        LedgerDetails {
            name: "Café Ravi & Sons".into(),
            gstin: "N/A".into(),
            address: "MG Road".into(),
            state: "Kerala".into(),
            mobile: "N/A".into(),
        }
    }

    #[test]
    fn page_is_a4_with_both_fonts() {
        let details = details();
        let sender = Sender::default();
        let note = PackingNote::new(Some("12".into()), &details, &sender);
        let doc = render(&note).unwrap();

        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);
        let page_id = pages[&1];
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box.len(), 4);

        let base_fonts: Vec<&[u8]> = doc
            .objects
            .values()
            .filter_map(|o| o.as_dict().ok()?.get(b"BaseFont").ok()?.as_name().ok())
            .collect();
        assert_eq!(base_fonts.len(), 2);
        assert!(base_fonts.contains(&b"Helvetica-Bold".as_slice()));
    }

    #[test]
    fn operations_show_every_text_element() {
        let details = details();
        let sender = Sender::default();
        let note = PackingNote::new(None, &details, &sender);
        let content = Content {
            operations: note.layout().iter().flat_map(operations).collect::<Vec<_>>(),
        };

        let shown: Vec<Vec<u8>> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands.first()?.as_str().ok().map(<[u8]>::to_vec))
            .collect();
        let texts = note
            .layout()
            .into_iter()
            .filter(|e| matches!(e, Element::Text { .. }))
            .count();
        assert_eq!(shown.len(), texts);
        assert_eq!(shown[1], encode_win_ansi("Café Ravi & Sons"));
        assert_eq!(
            content.operations.iter().filter(|op| op.operator == "S").count(),
            2
        );
    }

    #[test]
    fn info_dictionary_is_set() {
        let details = details();
        let sender = Sender::default();
        let doc = render(&PackingNote::new(Some("9".into()), &details, &sender)).unwrap();
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let info = doc.get_dictionary(info_id).unwrap();
        assert_eq!(info.get(b"Title").unwrap().as_str().unwrap(), b"Packing Note: 9");
        assert!(info
            .get(b"CreationDate")
            .unwrap()
            .as_str()
            .unwrap()
            .starts_with(b"D:"));
    }
}
