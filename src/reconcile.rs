//! Merging a structurally parsed IR with the IR read from its documentation

use crate::core::ir::{IntermediateRepr, ParamMap, ParamVal};

/// Merge one parameter: `default` from the structural side first, `doc` from
/// the documented side first, `typ` from whichever has it (structural wins)
pub fn merge_param(structural: ParamVal, documented: ParamVal) -> ParamVal {
    ParamVal {
        typ: structural.typ.or(documented.typ),
        doc: documented.doc.or(structural.doc),
        default: structural.default.or(documented.default),
    }
}

/// Merge two IRs of the same construct.
///
/// Params keep structural order. A param only the documentation mentions is
/// placed after the shared param it follows in the documentation, or first
/// when no shared param precedes it. `name` and `kind` come from the
/// structural side first; `body` and `header` only from it. `doc` comes from
/// the documented side when it has one.
pub fn merge(structural: IntermediateRepr, documented: IntermediateRepr) -> IntermediateRepr {
    let mut documented_params = documented.params;
    let documented_order: Vec<String> = documented_params.keys().map(str::to_string).collect();
    let mut params = ParamMap::new();
    for (name, param) in structural.params {
        let merged = match documented_params.remove(&name) {
            Some(doc_param) => merge_param(param, doc_param),
            None => param,
        };
        params.insert(name, merged);
    }

    let mut cursor = 0;
    for name in documented_order {
        match documented_params.remove(&name) {
            Some(param) => {
                params.insert_at(cursor, name, param);
                cursor += 1;
            }
            None => cursor = params.index_of(&name).map_or(cursor, |i| i + 1),
        }
    }

    let returns = match (structural.returns, documented.returns) {
        (Some(s), Some(d)) => Some(merge_param(s, d)),
        (s, d) => s.or(d),
    };

    IntermediateRepr {
        name: structural.name.or(documented.name),
        kind: structural.kind.or(documented.kind),
        doc: documented.doc.or(structural.doc),
        params,
        returns,
        body: structural.body,
        header: structural.header,
    }
}
