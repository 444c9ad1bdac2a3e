//! Code API index built from structured analysis records
//!
//! The input arrives already parsed (classes with nested methods, top-level
//! functions); this pass is a pure, lossless flattening into a name-keyed
//! map. The code index is the ground-truth layer: wherever documentation and
//! code disagree, the code side wins.

use super::{content_hash, ApiEntry, ApiIndex, ApiKind};
use crate::input::{FileAnalysis, FunctionRecord};
use tracing::debug;

/// Flatten per-file analysis records into a single API index.
///
/// Classes are keyed by class name, methods by "ClassName.method",
/// top-level functions by their own name.
pub fn build_code_index(analyses: &[FileAnalysis]) -> ApiIndex {
    let mut index = ApiIndex::new();

    for analysis in analyses {
        debug!(
            file = analysis.path.as_str(),
            fingerprint = %content_hash(&serialized(analysis)),
            "flattening analysis record"
        );

        for class in &analysis.classes {
            let mut entry = ApiEntry::new(&class.name, ApiKind::Class, &analysis.path);
            entry.docstring = class.docstring.clone();
            entry.base_classes = class.base_classes.clone();
            index.insert(entry.name.clone(), entry);

            for method in &class.methods {
                let name = format!("{}.{}", class.name, method.name);
                let entry = function_entry(&name, ApiKind::Method, method, &analysis.path);
                index.insert(name, entry);
            }
        }

        for function in &analysis.functions {
            let entry = function_entry(&function.name, ApiKind::Function, function, &analysis.path);
            index.insert(function.name.clone(), entry);
        }
    }

    index
}

fn function_entry(name: &str, kind: ApiKind, record: &FunctionRecord, source: &str) -> ApiEntry {
    let mut entry = ApiEntry::new(name, kind, source);
    entry.parameters = record.parameters.clone();
    entry.return_type = record.return_type.clone();
    entry.docstring = record.docstring.clone();
    entry.is_async = record.is_async;
    entry
}

fn serialized(analysis: &FileAnalysis) -> String {
    serde_json::to_string(analysis).unwrap_or_default()
}
