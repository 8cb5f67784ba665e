//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::error::{GeoPdfError, Result};
use crate::draw::color::Color;
use crate::draw::info::AdditionalInfo;
use crate::raster::image_handler::split_alpha;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::fs;
use std::io::Write;
use std::path::Path;

pub const PDF_VERSION: &str = "1.7";

pub fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Name prefix marking a real written by [`save`] with f64 precision
const EXACT_REAL: &[u8] = b"GeoPdfReal";

/// Real number keeping f64 precision in documents written with [`save`] or
/// [`save_to`]. lopdf stores reals as f32.
pub fn exact_real(value: f64) -> Object {
    if !value.is_finite() {
        return real(value);
    }
    let mut name = EXACT_REAL.to_vec();
    name.extend_from_slice(value.to_string().as_bytes());
    Object::Name(name)
}

/// Replace exact real markers with their decimal text, padded with zeros to
/// the marker length so the cross reference offsets stay valid.
fn write_exact_reals(bytes: &mut [u8]) {
    let mut marker = b"/".to_vec();
    marker.extend_from_slice(EXACT_REAL);
    let mut pos = 0;
    while let Some(found) = bytes[pos..]
        .windows(marker.len())
        .position(|window| window == &marker[..])
    {
        let start = pos + found;
        let digits = start + marker.len();
        let end = digits
            + bytes[digits..]
                .iter()
                .take_while(|b| b.is_ascii_digit() || **b == b'.' || **b == b'-')
                .count();
        let mut number = bytes[digits..end].to_vec();
        if !number.contains(&b'.') {
            number.push(b'.');
        }
        number.resize(end - start, b'0');
        bytes[start..end].copy_from_slice(&number);
        pos = end;
    }
}

pub fn text(value: &str) -> Object {
    Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Metadata written into the document information dictionary
#[derive(Clone, Debug, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// Content state a failed layer is rolled back to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Checkpoint {
    operations: usize,
    groups: usize,
    open_groups: usize,
    struct_elems: usize,
    xobjects: usize,
    viewports: usize,
}

struct OptionalContent {
    id: ObjectId,
    parent: Option<usize>,
}

/// Single page PDF under construction.
///
/// Collects content operations, image XObjects, optional content groups
/// and structure elements until `finish` assembles the document.
pub struct PdfSurface {
    doc: Document,
    pages_id: ObjectId,
    page_id: ObjectId,
    struct_root_id: ObjectId,
    width: f64,
    height: f64,
    operations: Vec<Operation>,
    xobjects: Dictionary,
    properties: Dictionary,
    groups: Vec<OptionalContent>,
    open_groups: Vec<usize>,
    struct_elems: Vec<ObjectId>,
    viewports: Vec<Object>,
}

impl PdfSurface {
    /// Empty page of `width × height` points
    pub fn new(width: f64, height: f64) -> PdfSurface {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        let page_id = doc.new_object_id();
        let struct_root_id = doc.new_object_id();
        PdfSurface {
            doc,
            pages_id,
            page_id,
            struct_root_id,
            width,
            height,
            operations: Vec::new(),
            xobjects: Dictionary::new(),
            properties: Dictionary::new(),
            groups: Vec::new(),
            open_groups: Vec::new(),
            struct_elems: Vec::new(),
            viewports: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn add_object<T: Into<Object>>(&mut self, object: T) -> ObjectId {
        self.doc.add_object(object)
    }

    pub fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn save_state(&mut self) {
        self.push("q", vec![]);
    }

    pub fn restore_state(&mut self) {
        self.push("Q", vec![]);
    }

    pub fn set_stroke_color(&mut self, color: &Color) {
        let [r, g, b] = color.to_pdf();
        self.push("RG", vec![r.into(), g.into(), b.into()]);
    }

    pub fn set_fill_color(&mut self, color: &Color) {
        let [r, g, b] = color.to_pdf();
        self.push("rg", vec![r.into(), g.into(), b.into()]);
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.push("w", vec![real(width)]);
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.push("m", vec![real(x), real(y)]);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.push("l", vec![real(x), real(y)]);
    }

    pub fn curve_to(&mut self, c1: (f64, f64), c2: (f64, f64), to: (f64, f64)) {
        self.push(
            "c",
            vec![
                real(c1.0),
                real(c1.1),
                real(c2.0),
                real(c2.1),
                real(to.0),
                real(to.1),
            ],
        );
    }

    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push("re", vec![real(x), real(y), real(width), real(height)]);
    }

    pub fn close_path(&mut self) {
        self.push("h", vec![]);
    }

    pub fn stroke(&mut self) {
        self.push("S", vec![]);
    }

    pub fn fill(&mut self) {
        self.push("f", vec![]);
    }

    pub fn fill_stroke(&mut self) {
        self.push("B", vec![]);
    }

    /// Open an optional content group nested in the currently open group
    pub fn begin_layer(&mut self, name: &str) {
        let id = self.doc.add_object(dictionary! {
            "Type" => "OCG",
            "Name" => text(name),
        });
        let index = self.groups.len();
        self.groups.push(OptionalContent {
            id,
            parent: self.open_groups.last().cloned(),
        });
        self.open_groups.push(index);
        let resource = format!("oc{}", index + 1);
        self.properties.set(resource.as_bytes().to_vec(), id);
        self.push("BDC", vec!["OC".into(), Object::Name(resource.into_bytes())]);
    }

    pub fn end_layer(&mut self) {
        if self.open_groups.pop().is_some() {
            self.push("EMC", vec![]);
        } else {
            warn!("end_layer without open optional content group");
        }
    }

    pub fn layer_count(&self) -> usize {
        self.groups.len()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            operations: self.operations.len(),
            groups: self.groups.len(),
            open_groups: self.open_groups.len(),
            struct_elems: self.struct_elems.len(),
            xobjects: self.xobjects.len(),
            viewports: self.viewports.len(),
        }
    }

    /// Discard everything emitted since `checkpoint`.
    /// Objects already added stay in the file unreferenced.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.operations.truncate(checkpoint.operations);
        for index in checkpoint.groups..self.groups.len() {
            self.properties.remove(format!("oc{}", index + 1).as_bytes());
        }
        self.groups.truncate(checkpoint.groups);
        self.open_groups.truncate(checkpoint.open_groups);
        self.struct_elems.truncate(checkpoint.struct_elems);
        let xobjects = self.xobjects.len();
        for index in checkpoint.xobjects..xobjects {
            self.xobjects.remove(format!("Im{}", index + 1).as_bytes());
        }
        self.viewports.truncate(checkpoint.viewports);
    }

    /// Open a marked content sequence carrying `info` as user properties.
    /// Returns false without emitting anything if `info` is empty.
    pub fn begin_tagged(&mut self, info: &AdditionalInfo) -> bool {
        if info.is_empty() {
            return false;
        }
        let mcid = self.struct_elems.len() as i64;
        let properties: Vec<Object> = info
            .iter()
            .map(|(key, value)| {
                Object::Dictionary(dictionary! {
                    "N" => text(key),
                    "V" => text(value),
                })
            })
            .collect();
        let elem_id = self.doc.add_object(dictionary! {
            "Type" => "StructElem",
            "S" => "Span",
            "P" => self.struct_root_id,
            "Pg" => self.page_id,
            "K" => mcid,
            "A" => dictionary! {
                "O" => "UserProperties",
                "P" => properties,
            },
        });
        self.struct_elems.push(elem_id);
        self.push(
            "BDC",
            vec![
                "Span".into(),
                Object::Dictionary(dictionary! { "MCID" => mcid }),
            ],
        );
        true
    }

    pub fn end_tagged(&mut self) {
        self.push("EMC", vec![]);
    }

    /// Place `image` with its lower left corner at `(x, y)`, scaled to
    /// `width × height` points. Returns the id of the image XObject.
    pub fn draw_image(
        &mut self,
        image: &RgbaImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<ObjectId> {
        let (rgb, alpha) = split_alpha(image);
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        if let Some(alpha) = alpha {
            let smask = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => image.width() as i64,
                    "Height" => image.height() as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                    "Filter" => "FlateDecode",
                },
                deflate(&alpha)?,
            );
            let smask_id = self.doc.add_object(smask);
            dict.set("SMask", smask_id);
        }
        let image_id = self.doc.add_object(Stream::new(dict, deflate(&rgb)?));
        let name = format!("Im{}", self.xobjects.len() + 1);
        self.xobjects.set(name.as_bytes().to_vec(), image_id);
        self.save_state();
        self.push(
            "cm",
            vec![
                real(width),
                0.into(),
                0.into(),
                real(height),
                real(x),
                real(y),
            ],
        );
        self.push("Do", vec![Object::Name(name.into_bytes())]);
        self.restore_state();
        Ok(image_id)
    }

    pub fn image_count(&self) -> usize {
        self.xobjects.len()
    }

    /// Attach `key` to the dictionary of a previously added stream or dictionary
    pub fn set_entry(&mut self, id: ObjectId, key: &str, value: Object) -> Result<()> {
        match self.doc.get_object_mut(id)? {
            Object::Stream(ref mut stream) => stream.dict.set(key, value),
            Object::Dictionary(ref mut dict) => dict.set(key, value),
            _ => {
                return Err(GeoPdfError::PdfCreation(format!(
                    "object {:?} has no dictionary",
                    id
                )))
            }
        }
        Ok(())
    }

    /// Add a page viewport with `bbox = [x1, y1, x2, y2]` and a measure dictionary
    pub fn add_viewport(&mut self, bbox: [f64; 4], name: &str, measure: ObjectId) {
        self.viewports.push(Object::Dictionary(dictionary! {
            "Type" => "Viewport",
            "BBox" => bbox.iter().map(|v| real(*v)).collect::<Vec<Object>>(),
            "Name" => text(name),
            "Measure" => measure,
        }));
    }

    fn optional_content_order(&self, parent: Option<usize>) -> Vec<Object> {
        let mut order = Vec::new();
        for (index, group) in self.groups.iter().enumerate() {
            if group.parent == parent {
                order.push(Object::Reference(group.id));
                let children = self.optional_content_order(Some(index));
                if !children.is_empty() {
                    order.push(Object::Array(children));
                }
            }
        }
        order
    }

    /// Assemble the document
    pub fn finish(mut self, info: &DocumentInfo) -> Result<Document> {
        while !self.open_groups.is_empty() {
            self.end_layer();
        }
        let content = Content {
            operations: std::mem::take(&mut self.operations),
        };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(self.width), real(self.height)],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => std::mem::take(&mut self.xobjects),
                "Properties" => std::mem::take(&mut self.properties),
            },
            "StructParents" => 0,
        };
        if !self.viewports.is_empty() {
            page.set("VP", std::mem::take(&mut self.viewports));
        }
        self.doc.objects.insert(self.page_id, Object::Dictionary(page));
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(self.page_id)],
                "Count" => 1,
            }),
        );

        let elems: Vec<Object> = self.struct_elems.iter().map(|id| Object::Reference(*id)).collect();
        let parent_tree_id = self.doc.add_object(dictionary! {
            "Nums" => vec![0.into(), Object::Array(elems.clone())],
        });
        self.doc.objects.insert(
            self.struct_root_id,
            Object::Dictionary(dictionary! {
                "Type" => "StructTreeRoot",
                "K" => elems,
                "ParentTree" => parent_tree_id,
                "ParentTreeNextKey" => 1,
            }),
        );

        let ocgs: Vec<Object> = self.groups.iter().map(|g| Object::Reference(g.id)).collect();
        let order = self.optional_content_order(None);
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
            "Extensions" => dictionary! {
                "ADBE" => dictionary! {
                    "BaseVersion" => "1.7",
                    "ExtensionLevel" => 3,
                },
            },
            "MarkInfo" => dictionary! {
                "Marked" => true,
                "UserProperties" => true,
            },
            "StructTreeRoot" => self.struct_root_id,
            "OCProperties" => dictionary! {
                "OCGs" => ocgs.clone(),
                "D" => dictionary! {
                    "Name" => text("Layers"),
                    "Order" => order,
                    "ON" => ocgs,
                    "BaseState" => "ON",
                },
            },
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut info_dict = dictionary! {
            "Producer" => text(concat!("geopdf ", env!("CARGO_PKG_VERSION"))),
        };
        if let Some(ref title) = info.title {
            info_dict.set("Title", text(title));
        }
        if let Some(ref author) = info.author {
            info_dict.set("Author", text(author));
        }
        if let Some(ref subject) = info.subject {
            info_dict.set("Subject", text(subject));
        }
        let info_id = self.doc.add_object(info_dict);
        self.doc.trailer.set("Info", info_id);
        Ok(self.doc)
    }
}

/// Write `doc` to `path`
pub fn save(doc: &mut Document, path: &Path) -> Result<()> {
    let mut bytes = Vec::new();
    save_to(doc, &mut bytes)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Serialize `doc` into `bytes`
pub fn save_to(doc: &mut Document, bytes: &mut Vec<u8>) -> Result<()> {
    let start = bytes.len();
    doc.save_to(bytes)?;
    write_exact_reals(&mut bytes[start..]);
    Ok(())
}
