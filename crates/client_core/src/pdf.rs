use lopdf::Document;

use crate::error::ClientError;

/// Counts the pages of a PDF held in memory.
pub fn count_pages(bytes: &[u8]) -> Result<u32, ClientError> {
    let document =
        Document::load_mem(bytes).map_err(|err| ClientError::Document(err.to_string()))?;
    u32::try_from(document.get_pages().len())
        .map_err(|_| ClientError::Document("page count out of range".to_string()))
}

#[cfg(test)]
pub(crate) fn sample_pdf(pages: usize) -> Vec<u8> {
    use lopdf::{dictionary, Object};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(595),
                    Object::Integer(842),
                ],
            })
            .into()
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize pdf");
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_pages_of_generated_pdf() {
        assert_eq!(count_pages(&sample_pdf(4)).expect("count"), 4);
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = count_pages(b"not a pdf").expect_err("garbage");
        assert!(matches!(err, ClientError::Document(_)));
    }
}
