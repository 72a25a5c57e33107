pub mod assemble;
pub mod constants;
mod engine;
pub mod link;
pub mod loader;
pub mod offsets;
mod options;
pub mod outline;
pub mod page;
pub mod render;
mod serialize;
pub mod stamp;
pub mod toc;
mod types;

pub use assemble::{AssembledDocument, assemble};
pub use engine::{
    BilingualEngine, BilingualRequest, RenderedSet, Stage, assemble_rendered,
    assemble_rendered_blocking,
};
pub use link::{LinkReport, attach_links, plan_links};
pub use loader::{LoadedDocument, load_document, read_pdf, write_pdf};
pub use offsets::{compute_ranges, format_page_range};
pub use options::*;
pub use outline::build_outline;
pub use render::{HttpRenderClient, RenderClient, RenderRequest};
pub use serialize::{BilingualOutput, EncodedOutput, decode_document, serialize};
pub use stamp::stamp_page_numbers;
pub use toc::{DrawnTocRenderer, HtmlTocRenderer, TocLayout, TocRenderer};
pub use types::*;
