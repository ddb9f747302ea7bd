//! One decoded row of a walk.

use std::fmt;

use crate::display;
use crate::oid::Oid;
use crate::session::Endpoint;
use crate::varbind::VarBind;

/// A retrieved tree entry, ready to show.
///
/// Records are only built by the fetch orchestrator and never change
/// afterwards, so the fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    oid: Oid,
    display_name: String,
    value_text: String,
    value_type: String,
    source_endpoint: String,
}

impl Record {
    /// Decode a varbind received from `endpoint`.
    pub(crate) fn from_varbind(varbind: &VarBind, endpoint: &Endpoint) -> Self {
        let shown = display::decode(&varbind.value);
        Self {
            display_name: varbind
                .oid
                .last_arc()
                .map(|arc| arc.to_string())
                .unwrap_or_default(),
            oid: varbind.oid.clone(),
            value_text: shown.text,
            value_type: shown.type_tag.to_string(),
            source_endpoint: endpoint.to_string(),
        }
    }

    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Last arc of the OID, e.g. `"0"` for `sysDescr.0`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn value_text(&self) -> &str {
        &self.value_text
    }

    /// Wire type name such as `"OctetString"`.
    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    /// Agent the record came from, as `host:port`.
    pub fn source_endpoint(&self) -> &str {
        &self.source_endpoint
    }

    /// `"<display_name> (<oid>)"`
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name, self.oid)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}: {}", self.oid, self.value_type, self.value_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::value::Value;

    #[test]
    fn built_from_varbind() {
        let vb = VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 2), Value::from("myRouter"));
        let record = Record::from_varbind(&vb, &Endpoint::new("192.0.2.10", 161));

        assert_eq!(record.oid(), &oid!(1, 3, 6, 1, 2, 1, 1, 2));
        assert_eq!(record.display_name(), "2");
        assert_eq!(record.value_text(), "myRouter");
        assert_eq!(record.value_type(), "OctetString");
        assert_eq!(record.source_endpoint(), "192.0.2.10:161");
        assert_eq!(record.label(), "2 (1.3.6.1.2.1.1.2)");
        assert_eq!(
            record.to_string(),
            "1.3.6.1.2.1.1.2 = OctetString: myRouter"
        );
    }
}
