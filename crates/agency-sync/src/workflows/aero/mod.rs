//! AeroClub: one XML document per company, each with its own extract and minimum.

mod mapping;
mod profile;
mod xml;

pub use mapping::AeroRow;
pub use profile::{AeroProfile, DocumentKind, LocalizedName, ProfileBuilder, TravelDocument};
pub use xml::{render_profiles, XmlError, PROFILES_NS, XSI_NS, XS_NS};

use crate::config::{AeroClubSettings, AeroCompany};
use crate::workflows::delivery::{Delivery, DeliveryResult, OutboundRequest};
use crate::workflows::masking::{GenderEncoding, PrivacyMask};
use crate::workflows::rejections::RejectionLog;
use crate::workflows::source::{RawRecord, RowSource};
use crate::workflows::{fetch_rows, CompanyOutcome, RunSummary};

pub const AGENCY_NAME: &str = "AeroClub";

pub const CONTENT_TYPE: &str =
    "application/vnd.aeroclub.integration-hub.profiles.v1+xml; charset=UTF-8";

#[derive(Debug)]
pub struct AeroAgent<'a> {
    settings: &'a AeroClubSettings,
    debug_limit_off: bool,
}

impl<'a> AeroAgent<'a> {
    pub fn new(settings: &'a AeroClubSettings, debug_limit_off: bool) -> Self {
        Self {
            settings,
            debug_limit_off,
        }
    }

    /// Companies below their minimum are skipped; the run always continues.
    pub fn run(&self, source: &mut dyn RowSource, delivery: &Delivery) -> RunSummary {
        let mut summary = RunSummary::default();
        let mask = PrivacyMask::new(self.debug_limit_off, GenderEncoding::TitleCase);

        for company in &self.settings.companies {
            tracing::info!(company = %company.id, procedure = %company.stored_proc, "fetching employees");
            let rows = fetch_rows(source, &company.stored_proc);

            if self.debug_limit_off {
                tracing::info!(
                    company = %company.id,
                    min_counter = company.min_counter,
                    "debug flag is on, minimum limit ignored"
                );
            } else if rows.is_empty() || rows.len() < company.min_counter {
                tracing::error!(
                    company = %company.id,
                    agency = AGENCY_NAME,
                    found = rows.len(),
                    required = company.min_counter,
                    "employee count is below the company minimum, company skipped"
                );
                summary.push(
                    &company.id,
                    CompanyOutcome::BelowThreshold {
                        found: rows.len(),
                        required: company.min_counter,
                    },
                    0,
                );
                continue;
            }

            let mut rejections = RejectionLog::new();
            let profiles = self.build_profiles(&rows, company, &mask, &mut rejections);
            rejections.report("XML for AeroClub");

            let outcome = self.deliver_company(company, &profiles, delivery);
            summary.push(&company.id, outcome, rejections.count());
        }

        summary
    }

    /// Debug runs stop after the first profile that validates.
    fn build_profiles(
        &self,
        rows: &[RawRecord],
        company: &AeroCompany,
        mask: &PrivacyMask,
        rejections: &mut RejectionLog,
    ) -> Vec<AeroProfile> {
        let builder = ProfileBuilder::new(mask);
        let mut profiles = Vec::new();

        for record in rows {
            match builder.build(&AeroRow::from_record(record), &company.id) {
                Ok(profile) => {
                    profiles.push(profile);
                    if self.debug_limit_off {
                        tracing::info!(company = %company.id, "debug flag is on, list limited to one record");
                        break;
                    }
                }
                Err(rejection) => rejections.push(rejection),
            }
        }

        profiles
    }

    fn deliver_company(
        &self,
        company: &AeroCompany,
        profiles: &[AeroProfile],
        delivery: &Delivery,
    ) -> CompanyOutcome {
        if profiles.is_empty() {
            tracing::warn!(company = %company.id, "no valid profiles left, company skipped");
            return CompanyOutcome::NothingToSend;
        }
        let records = profiles.len();

        let body = match render_profiles(profiles) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(company = %company.id, error = %err, "unable to build profiles document");
                return CompanyOutcome::SerializationFailed;
            }
        };

        tracing::info!(company = %company.id, agency = AGENCY_NAME, records, "sending employees");
        match delivery.deliver(&self.request(body)) {
            Some(DeliveryResult {
                status,
                body: Some(response),
                ..
            }) => {
                tracing::info!(company = %company.id, status, size = response.len(), "agency answered");
                CompanyOutcome::Delivered { records }
            }
            Some(DeliveryResult { status, .. }) => {
                tracing::warn!(company = %company.id, status, "response received but its content is empty");
                CompanyOutcome::NotDelivered { records }
            }
            None => {
                tracing::warn!(company = %company.id, "request failed, no response obtained");
                CompanyOutcome::NotDelivered { records }
            }
        }
    }

    fn request(&self, body: Vec<u8>) -> OutboundRequest {
        let settings = self.settings;
        OutboundRequest {
            url: settings.url.clone(),
            headers: vec![
                ("Host".to_string(), settings.source_url.clone()),
                ("User-Agent".to_string(), settings.user_agent.clone()),
                ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            ],
            username: settings.username.clone(),
            password: settings.password.clone(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AeroClubSettings {
        AeroClubSettings {
            url: "https://hub.aero.example/profiles".to_string(),
            source_url: "hub.aero.example".to_string(),
            user_agent: "agency-sync".to_string(),
            username: "sync".to_string(),
            password: "secret".to_string(),
            companies: Vec::new(),
        }
    }

    fn company() -> AeroCompany {
        AeroCompany {
            key: "main".to_string(),
            id: "NESTLE_RUSSIA".to_string(),
            min_counter: 1,
            stored_proc: "GetAeroEmployees".to_string(),
        }
    }

    fn record(tab: &str, birthday: &str) -> RawRecord {
        let mut fields = vec![""; 29];
        fields[1] = "Петров";
        fields[2] = "Иван";
        fields[6] = "RU";
        fields[7] = "m";
        fields[8] = birthday;
        fields[21] = tab;
        fields[22] = "G7";
        fields[23] = "Analyst";
        fields[24] = "Finance";
        fields[25] = "Reporting";
        RawRecord::from_strs(&fields)
    }

    #[test]
    fn request_carries_agency_headers() {
        let settings = settings();
        let request = AeroAgent::new(&settings, false).request(b"<profiles/>".to_vec());
        assert_eq!(request.url, "https://hub.aero.example/profiles");
        assert_eq!(
            request.headers,
            vec![
                ("Host".to_string(), "hub.aero.example".to_string()),
                ("User-Agent".to_string(), "agency-sync".to_string()),
                ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            ]
        );
    }

    #[test]
    fn rejected_rows_are_collected_and_valid_ones_kept() {
        let settings = settings();
        let rows = vec![record("1", ""), record("2", "05.03.1984"), record("3", "")];
        let mask = PrivacyMask::new(false, GenderEncoding::TitleCase);
        let mut rejections = RejectionLog::new();

        let profiles = AeroAgent::new(&settings, false).build_profiles(
            &rows,
            &company(),
            &mask,
            &mut rejections,
        );
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].unique_identifier, "00000002");
        assert_eq!(rejections.count(), 2);
        assert_eq!(rejections.entries()[0].to_string(), "00000001 - problem with birth date");
    }

    #[test]
    fn debug_stops_after_first_valid_profile() {
        let settings = settings();
        let rows = vec![
            record("1", ""),
            record("2", "05.03.1984"),
            record("3", "06.03.1984"),
        ];
        let mask = PrivacyMask::new(true, GenderEncoding::TitleCase);
        let mut rejections = RejectionLog::new();

        let profiles = AeroAgent::new(&settings, true).build_profiles(
            &rows,
            &company(),
            &mask,
            &mut rejections,
        );
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].unique_identifier, "00001234");
        assert_eq!(rejections.count(), 1);
    }
}
