// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory provider used by reconciler tests.
//!
//! Applies REPLACE changes the way PowerDNS does: the record list is
//! substituted whole, and an empty list removes the RRSet.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::SolverError;
use crate::pdns::{ChangeType, NameMode, RRSet, RRSets, Record, Zone, ZoneApi};

#[derive(Debug, Default)]
pub(crate) struct FakeZoneApi {
    pub rrsets: Mutex<Vec<RRSet>>,
    pub patches: Mutex<Vec<RRSets>>,
    pub gets: Mutex<usize>,
    pub fail_get: Option<u16>,
    pub fail_patch: Option<u16>,
    pub name_mode: NameMode,
}

impl FakeZoneApi {
    pub fn with_txt(name: &str, contents: &[&str]) -> Self {
        let fake = Self::default();
        fake.rrsets.lock().unwrap().push(txt_rrset(name, contents));
        fake
    }

    pub fn txt_contents(&self, name: &str) -> Option<Vec<String>> {
        self.rrsets
            .lock()
            .unwrap()
            .iter()
            .find(|set| set.is_txt_at(name))
            .map(|set| set.records.iter().map(|r| r.content.clone()).collect())
    }

    pub fn patch_count(&self) -> usize {
        self.patches.lock().unwrap().len()
    }

    pub fn get_count(&self) -> usize {
        *self.gets.lock().unwrap()
    }

    fn error(method: &str, status: u16) -> SolverError {
        SolverError::ProviderRequest {
            method: method.to_string(),
            url: "http://fake/zones/example.com.".to_string(),
            status: Some(status),
            reason: "injected failure".to_string(),
        }
    }
}

pub(crate) fn txt_rrset(name: &str, contents: &[&str]) -> RRSet {
    RRSet {
        name: Some(name.to_string()),
        record_type: Some("TXT".to_string()),
        ttl: Some(300),
        changetype: None,
        records: contents.iter().map(|c| Record::enabled(*c)).collect(),
    }
}

#[async_trait]
impl ZoneApi for FakeZoneApi {
    async fn get_zone(&self, zone: &str) -> Result<Zone, SolverError> {
        *self.gets.lock().unwrap() += 1;
        if let Some(status) = self.fail_get {
            return Err(Self::error("GET", status));
        }
        Ok(Zone {
            id: Some(zone.to_string()),
            name: Some(zone.to_string()),
            rrsets: self.rrsets.lock().unwrap().clone(),
        })
    }

    async fn patch_zone(&self, _zone: &str, changes: &RRSets) -> Result<(), SolverError> {
        if let Some(status) = self.fail_patch {
            return Err(Self::error("PATCH", status));
        }
        self.patches.lock().unwrap().push(changes.clone());

        let mut rrsets = self.rrsets.lock().unwrap();
        for change in &changes.rrsets {
            let same_set = |set: &RRSet| set.name == change.name && set.record_type == change.record_type;
            rrsets.retain(|set| !same_set(set));
            if change.changetype == Some(ChangeType::Replace) && !change.records.is_empty() {
                rrsets.push(RRSet {
                    changetype: None,
                    ..change.clone()
                });
            }
        }
        Ok(())
    }

    fn name_mode(&self) -> NameMode {
        self.name_mode
    }
}
