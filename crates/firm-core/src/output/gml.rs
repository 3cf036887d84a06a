//! GML export of the final employment network.
//!
//! Plain hand-rolled GML: the format is line-oriented and tiny, and the
//! node attribute set is fixed, so a writer is a dozen `writeln!` calls.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use firm_events::NetworkExport;

use crate::error::SimError;

/// Render a float so GML readers keep it a real, not an integer.
fn gml_float(value: f64) -> String {
    let s = format!("{value}");
    if s.contains('.') || s.contains('e') || s.contains("inf") || s.contains("NaN") {
        s
    } else {
        format!("{s}.0")
    }
}

/// Write the network to `path` in GML form, one node per agent with its
/// final economic state attached.
pub fn write_gml(path: impl AsRef<Path>, network: &NetworkExport) -> Result<(), SimError> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "graph [")?;
    writeln!(w, "  directed 1")?;
    for node in &network.nodes {
        writeln!(w, "  node [")?;
        writeln!(w, "    id {}", node.id)?;
        writeln!(w, "    label \"{}\"", node.id)?;
        writeln!(w, "    savings {}", gml_float(node.savings))?;
        writeln!(w, "    wage {}", gml_float(node.wage))?;
        writeln!(w, "    loan {}", gml_float(node.loan))?;
        writeln!(w, "    firm {}", node.firm)?;
        writeln!(w, "  ]")?;
    }
    for edge in &network.edges {
        writeln!(w, "  edge [")?;
        writeln!(w, "    source {}", edge.source)?;
        writeln!(w, "    target {}", edge.target)?;
        writeln!(w, "  ]")?;
    }
    writeln!(w, "]")?;
    w.flush()?;
    Ok(())
}
