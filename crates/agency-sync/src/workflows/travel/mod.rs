//! CBTC Travel-Click: one JSON document per company, analysed after delivery.

mod employee;
mod mapping;
mod response;

pub use employee::{
    AuthBlock, Authorizer, EmployeeBuilder, IdentityCard, IdentityCardType, PersonName,
    ServiceInfo, TravelEmployee, HOME_COUNTRY,
};
pub use mapping::TravelRow;
pub use response::{
    analyze, render_error_report, scrub_personal_names, ResponseAnalysis, ResponseError,
};

use serde::Serialize;

use crate::config::{TravelClickSettings, TravelCompany};
use crate::workflows::delivery::{Delivery, OutboundRequest};
use crate::workflows::masking::{GenderEncoding, PrivacyMask};
use crate::workflows::rejections::RejectionLog;
use crate::workflows::source::RowSource;
use crate::workflows::{fetch_rows, CompanyOutcome, RunSummary};

pub const AGENCY_NAME: &str = "CBTC Travel-Click";

const CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Body posted for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayload {
    pub company: String,
    pub confirm: bool,
    pub full_update: bool,
    pub increment_update: bool,
    pub employees: Vec<TravelEmployee>,
}

#[derive(Debug)]
pub struct TravelAgent<'a> {
    settings: &'a TravelClickSettings,
    debug_limit_off: bool,
}

impl<'a> TravelAgent<'a> {
    pub fn new(settings: &'a TravelClickSettings, debug_limit_off: bool) -> Self {
        Self {
            settings,
            debug_limit_off,
        }
    }

    /// Fetches the agency extract once, then builds and delivers each company in order.
    pub fn run(&self, source: &mut dyn RowSource, delivery: &Delivery) -> RunSummary {
        let mut summary = RunSummary::default();
        let settings = self.settings;

        tracing::info!(agency = AGENCY_NAME, procedure = %settings.stored_proc, "fetching employees");
        let rows: Vec<TravelRow> = fetch_rows(source, &settings.stored_proc)
            .iter()
            .map(TravelRow::from_record)
            .collect();

        if self.debug_limit_off {
            tracing::info!(
                min_counter = settings.min_counter,
                "debug flag is on, minimum limit ignored"
            );
        } else if rows.is_empty() || rows.len() < settings.min_counter {
            tracing::error!(
                agency = AGENCY_NAME,
                found = rows.len(),
                required = settings.min_counter,
                "employee count is below the agency minimum, run aborted"
            );
            summary.aborted = true;
            return summary;
        }

        let mask = PrivacyMask::new(self.debug_limit_off, GenderEncoding::UpperCase);
        let builder = EmployeeBuilder::new(&settings.new_user, &mask);

        for company in &settings.companies {
            tracing::info!(company = %company.id, key = %company.key, "assembling company list");
            let group = self.company_rows(&rows, company);
            if group.is_empty() {
                tracing::warn!(company = %company.id, "empty data list, run stopped");
                summary.aborted = true;
                break;
            }

            let mut rejections = RejectionLog::new();
            let employees: Vec<TravelEmployee> = group
                .into_iter()
                .filter_map(|row| builder.build(row).map_err(|err| rejections.push(err)).ok())
                .collect();
            rejections.report("JSON for CBTC Travel-Click");

            let outcome = self.deliver_company(company, employees, delivery);
            summary.push(&company.id, outcome, rejections.count());
        }

        summary
    }

    /// Debug runs keep only the first matching row.
    fn company_rows<'r>(&self, rows: &'r [TravelRow], company: &TravelCompany) -> Vec<&'r TravelRow> {
        let matching = rows.iter().filter(|row| row.belongs_to(&company.id));
        if self.debug_limit_off {
            tracing::info!(company = %company.id, "debug flag is on, list limited to one record");
            matching.take(1).collect()
        } else {
            matching.collect()
        }
    }

    fn deliver_company(
        &self,
        company: &TravelCompany,
        employees: Vec<TravelEmployee>,
        delivery: &Delivery,
    ) -> CompanyOutcome {
        if employees.is_empty() {
            tracing::warn!(company = %company.id, "no valid employees left, company skipped");
            return CompanyOutcome::NothingToSend;
        }
        let records = employees.len();
        tracing::info!(company = %company.id, records, "company list assembled");

        let payload = CompanyPayload {
            company: company.id.trim().to_string(),
            confirm: company.confirm,
            full_update: company.full_update,
            increment_update: company.increment_update,
            employees,
        };
        let body = match serde_json::to_vec(&payload) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(company = %company.id, error = %err, "unable to encode company payload");
                return CompanyOutcome::SerializationFailed;
            }
        };

        tracing::info!(company = %company.id, agency = AGENCY_NAME, "sending employees");
        match delivery.send(&self.request(body)) {
            Some(response) => {
                match analyze(&response) {
                    Ok(analysis) => analysis.report(),
                    Err(err) => tracing::error!(company = %company.id, error = %err, "unable to analyse response"),
                }
                CompanyOutcome::Delivered { records }
            }
            None => CompanyOutcome::NotDelivered { records },
        }
    }

    fn request(&self, body: Vec<u8>) -> OutboundRequest {
        let settings = self.settings;
        let (url, password) = if self.debug_limit_off {
            tracing::info!("debug flag is on, sending to the development endpoint");
            (&settings.travel_dev.url, &settings.travel_dev.password)
        } else {
            (&settings.url, &settings.password)
        };

        OutboundRequest {
            url: url.clone(),
            headers: vec![("content-type".to_string(), CONTENT_TYPE.to_string())],
            username: settings.username.clone(),
            password: password.clone(),
            body,
        }
    }
}
