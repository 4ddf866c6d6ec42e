//! Image-embed mode: the payload is a PNG to be placed on a new page.

use image::ImageFormat;
use lopdf::{
  Document, Object, Stream,
  content::{Content, Operation},
  dictionary,
};

use crate::{Error, Result};

/// A4 width in points.
pub const PAGE_WIDTH: f32 = 595.28;
/// A4 height in points.
pub const PAGE_HEIGHT: f32 = 841.89;

/// Images are drawn at this fraction of their pixel size (1 px = 1 pt).
const IMAGE_SCALE: f32 = 0.5;

const IMAGE_NAME: &str = "Im0";

/// Build a single-page PDF with the PNG in `bytes` centred on the page.
pub fn embed_png(bytes: &[u8]) -> Result<Vec<u8>> {
  let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)
    .map_err(|e| Error::MalformedDocument(format!("not a PNG image: {e}")))?;

  let (width, height) = (img.width(), img.height());
  let mut doc = Document::with_version("1.7");

  let mut image_dict = dictionary! {
    "Type"             => "XObject",
    "Subtype"          => "Image",
    "Width"            => i64::from(width),
    "Height"           => i64::from(height),
    "ColorSpace"       => "DeviceRGB",
    "BitsPerComponent" => 8,
  };
  if img.color().has_alpha() {
    let alpha: Vec<u8> = img.to_rgba8().pixels().map(|p| p.0[3]).collect();
    let smask_id = doc.add_object(Stream::new(
      dictionary! {
        "Type"             => "XObject",
        "Subtype"          => "Image",
        "Width"            => i64::from(width),
        "Height"           => i64::from(height),
        "ColorSpace"       => "DeviceGray",
        "BitsPerComponent" => 8,
      },
      alpha,
    ));
    image_dict.set("SMask", smask_id);
  }
  let image_id =
    doc.add_object(Stream::new(image_dict, img.to_rgb8().into_raw()));

  let draw_width = width as f32 * IMAGE_SCALE;
  let draw_height = height as f32 * IMAGE_SCALE;
  let x = PAGE_WIDTH / 2.0 - draw_width / 2.0;
  let y = PAGE_HEIGHT / 2.0 - draw_height / 2.0;

  let content = Content {
    operations: vec![
      Operation::new("q", vec![]),
      Operation::new(
        "cm",
        vec![
          draw_width.into(),
          0.0f32.into(),
          0.0f32.into(),
          draw_height.into(),
          x.into(),
          y.into(),
        ],
      ),
      Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
      Operation::new("Q", vec![]),
    ],
  };
  let content_bytes = content
    .encode()
    .map_err(|e| Error::Serialize(e.to_string()))?;
  let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

  let pages_id = doc.new_object_id();
  let page_id = doc.add_object(dictionary! {
    "Type"      => "Page",
    "Parent"    => pages_id,
    "MediaBox"  => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    "Contents"  => content_id,
    "Resources" => dictionary! {
      "XObject" => dictionary! { IMAGE_NAME => image_id },
    },
  });
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type"  => "Pages",
      "Kids"  => vec![page_id.into()],
      "Count" => 1,
    }),
  );
  let catalog_id = doc.add_object(dictionary! {
    "Type"  => "Catalog",
    "Pages" => pages_id,
  });
  doc.trailer.set("Root", catalog_id);
  doc.compress();

  let mut out = Vec::new();
  doc
    .save_to(&mut out)
    .map_err(|e| Error::Serialize(e.to_string()))?;

  tracing::debug!(width, height, pdf_bytes = out.len(), "embedded PNG");
  Ok(out)
}
