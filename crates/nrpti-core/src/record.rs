//! # Record Types and Publication Flavours
//!
//! `RecordType` is the one definition of which compliance record types exist.
//! `FlavourKind` names the public sites a record can be published to. Which
//! flavours a record type supports is fixed here, so adding a record type
//! forces its flavour list to be declared.
//!
//! A flavour document's schema name is the record type's schema name with
//! the flavour suffix appended, e.g. `Order` + `LNG` = `OrderLNG`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::NrptiError;

/// A public site a record can be rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlavourKind {
    /// LNG Canada public transparency site.
    #[serde(rename = "LNG")]
    Lng,
    /// Natural Resource Compliance and Enforcement Database.
    #[serde(rename = "NRCED")]
    Nrced,
    /// BC Mine Information site.
    #[serde(rename = "BCMI")]
    Bcmi,
}

impl FlavourKind {
    pub fn all() -> &'static [FlavourKind] {
        &[Self::Lng, Self::Nrced, Self::Bcmi]
    }

    /// Schema-name suffix. Matches the serde format.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Lng => "LNG",
            Self::Nrced => "NRCED",
            Self::Bcmi => "BCMI",
        }
    }

    /// Schema name of this flavour of `record_type`.
    pub fn schema_name(&self, record_type: RecordType) -> String {
        format!("{}{}", record_type.as_str(), self.suffix())
    }
}

impl std::fmt::Display for FlavourKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for FlavourKind {
    type Err = NrptiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LNG" => Ok(Self::Lng),
            "NRCED" => Ok(Self::Nrced),
            "BCMI" => Ok(Self::Bcmi),
            other => Err(NrptiError::UnknownFlavour(other.to_string())),
        }
    }
}

/// Every compliance record type managed by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordType {
    Order,
    Inspection,
    Certificate,
    CertificateAmendment,
    Permit,
    Agreement,
    SelfReport,
    RestorativeJustice,
    Ticket,
    AdministrativePenalty,
    AdministrativeSanction,
    Warning,
    ConstructionPlan,
    ManagementPlan,
    CourtConviction,
    AnnualReport,
    Correspondence,
    DamSafetyInspection,
    Report,
}

impl RecordType {
    pub fn all() -> &'static [RecordType] {
        &[
            Self::Order,
            Self::Inspection,
            Self::Certificate,
            Self::CertificateAmendment,
            Self::Permit,
            Self::Agreement,
            Self::SelfReport,
            Self::RestorativeJustice,
            Self::Ticket,
            Self::AdministrativePenalty,
            Self::AdministrativeSanction,
            Self::Warning,
            Self::ConstructionPlan,
            Self::ManagementPlan,
            Self::CourtConviction,
            Self::AnnualReport,
            Self::Correspondence,
            Self::DamSafetyInspection,
            Self::Report,
        ]
    }

    /// Master schema name. Matches the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "Order",
            Self::Inspection => "Inspection",
            Self::Certificate => "Certificate",
            Self::CertificateAmendment => "CertificateAmendment",
            Self::Permit => "Permit",
            Self::Agreement => "Agreement",
            Self::SelfReport => "SelfReport",
            Self::RestorativeJustice => "RestorativeJustice",
            Self::Ticket => "Ticket",
            Self::AdministrativePenalty => "AdministrativePenalty",
            Self::AdministrativeSanction => "AdministrativeSanction",
            Self::Warning => "Warning",
            Self::ConstructionPlan => "ConstructionPlan",
            Self::ManagementPlan => "ManagementPlan",
            Self::CourtConviction => "CourtConviction",
            Self::AnnualReport => "AnnualReport",
            Self::Correspondence => "Correspondence",
            Self::DamSafetyInspection => "DamSafetyInspection",
            Self::Report => "Report",
        }
    }

    /// Flavours this record type can be published as.
    pub fn flavours(&self) -> &'static [FlavourKind] {
        use FlavourKind::{Bcmi, Lng, Nrced};
        match self {
            Self::Order
            | Self::Inspection
            | Self::RestorativeJustice
            | Self::Ticket
            | Self::AdministrativePenalty
            | Self::AdministrativeSanction
            | Self::Warning
            | Self::CourtConviction => &[Lng, Nrced],
            Self::Certificate
            | Self::Agreement
            | Self::SelfReport
            | Self::ConstructionPlan
            | Self::ManagementPlan => &[Lng],
            Self::CertificateAmendment | Self::Permit => &[Lng, Bcmi],
            Self::AnnualReport => &[Bcmi],
            Self::Correspondence | Self::DamSafetyInspection | Self::Report => &[Nrced, Bcmi],
        }
    }

    pub fn supports(&self, flavour: FlavourKind) -> bool {
        self.flavours().contains(&flavour)
    }

    /// Split a schema name into record type and optional flavour.
    ///
    /// `"Order"` → `(Order, None)`, `"OrderNRCED"` → `(Order, Some(Nrced))`.
    /// A flavour suffix the record type does not support is rejected.
    pub fn parse_schema_name(name: &str) -> Result<(RecordType, Option<FlavourKind>), NrptiError> {
        if let Ok(rt) = name.parse::<RecordType>() {
            return Ok((rt, None));
        }
        for flavour in FlavourKind::all() {
            if let Some(base) = name.strip_suffix(flavour.suffix()) {
                if let Ok(rt) = base.parse::<RecordType>() {
                    if rt.supports(*flavour) {
                        return Ok((rt, Some(*flavour)));
                    }
                }
            }
        }
        Err(NrptiError::UnknownRecordType(name.to_string()))
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = NrptiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|rt| rt.as_str() == s)
            .ok_or_else(|| NrptiError::UnknownRecordType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_record_type_has_a_flavour() {
        for rt in RecordType::all() {
            assert!(!rt.flavours().is_empty(), "{rt} has no flavours");
        }
    }

    #[test]
    fn as_str_roundtrip() {
        for rt in RecordType::all() {
            assert_eq!(rt.as_str().parse::<RecordType>().unwrap(), *rt);
        }
    }

    #[test]
    fn serde_format_matches_as_str() {
        for rt in RecordType::all() {
            assert_eq!(serde_json::to_string(rt).unwrap(), format!("\"{}\"", rt.as_str()));
        }
        for f in FlavourKind::all() {
            assert_eq!(serde_json::to_string(f).unwrap(), format!("\"{}\"", f.suffix()));
        }
    }

    #[test]
    fn schema_names() {
        assert_eq!(FlavourKind::Lng.schema_name(RecordType::Order), "OrderLNG");
        assert_eq!(
            FlavourKind::Bcmi.schema_name(RecordType::DamSafetyInspection),
            "DamSafetyInspectionBCMI"
        );
    }

    #[test]
    fn parse_schema_name_splits_flavour() {
        assert_eq!(
            RecordType::parse_schema_name("Order").unwrap(),
            (RecordType::Order, None)
        );
        assert_eq!(
            RecordType::parse_schema_name("OrderNRCED").unwrap(),
            (RecordType::Order, Some(FlavourKind::Nrced))
        );
        assert_eq!(
            RecordType::parse_schema_name("PermitBCMI").unwrap(),
            (RecordType::Permit, Some(FlavourKind::Bcmi))
        );
    }

    #[test]
    fn parse_schema_name_rejects_unsupported_flavour() {
        assert!(RecordType::parse_schema_name("AgreementBCMI").is_err());
        assert!(RecordType::parse_schema_name("Widget").is_err());
    }

    #[test]
    fn annual_reports_are_mines_only() {
        assert!(RecordType::AnnualReport.supports(FlavourKind::Bcmi));
        assert!(!RecordType::AnnualReport.supports(FlavourKind::Lng));
    }
}
