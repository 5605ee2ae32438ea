pub mod frontend;
pub mod printer;

pub use frontend::{is_typescript_path, JsFrontend, ParseMode, ParsedProgram};
pub use printer::{CanonicalPrinter, ExprSerializer, JsPrinter, PrinterConfig};
