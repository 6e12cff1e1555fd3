#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use agency_sync::workflows::delivery::{
    HttpTransport, OutboundRequest, TransportError, TransportResponse,
};
use agency_sync::workflows::source::{RawRecord, RowSource, SourceError};

/// Serves canned extracts by procedure name and records every call.
#[derive(Debug, Default)]
pub struct FakeRowSource {
    extracts: HashMap<String, Vec<RawRecord>>,
    pub calls: Vec<String>,
}

impl FakeRowSource {
    pub fn with(mut self, procedure: &str, rows: Vec<RawRecord>) -> Self {
        self.extracts.insert(procedure.to_string(), rows);
        self
    }
}

impl RowSource for FakeRowSource {
    fn fetch(&mut self, procedure: &str) -> Result<Vec<RawRecord>, SourceError> {
        self.calls.push(procedure.to_string());
        self.extracts
            .get(procedure)
            .cloned()
            .ok_or_else(|| SourceError::InvalidProcedure(procedure.to_string()))
    }
}

/// Answers posts from a script, defaulting to `200 {}`, and keeps what was sent.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    replies: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    pub sent: Arc<Mutex<Vec<OutboundRequest>>>,
}

impl RecordingTransport {
    pub fn replying(replies: Vec<Result<TransportResponse, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }
}

impl HttpTransport for RecordingTransport {
    fn post(
        &self,
        request: &OutboundRequest,
        _proxy: Option<&str>,
    ) -> Result<TransportResponse, TransportError> {
        self.sent.lock().expect("sent mutex").push(request.clone());
        self.replies
            .lock()
            .expect("replies mutex")
            .pop_front()
            .unwrap_or_else(|| {
                Ok(TransportResponse {
                    status: 200,
                    body: b"{}".to_vec(),
                })
            })
    }

    fn get_text(&self, _url: &str) -> Result<String, TransportError> {
        Err(TransportError::Other("discovery not scripted".to_string()))
    }
}

pub fn ok(status: u16, body: &[u8]) -> Result<TransportResponse, TransportError> {
    Ok(TransportResponse {
        status,
        body: body.to_vec(),
    })
}

/// Builds a record of `len` blank fields with the given positions filled.
pub fn record(len: usize, values: &[(usize, &str)]) -> RawRecord {
    let mut fields = vec![""; len];
    for (index, value) in values {
        fields[*index] = *value;
    }
    RawRecord::from_strs(&fields)
}
