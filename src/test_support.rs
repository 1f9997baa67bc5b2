// In-memory fakes for unit and router tests
//
// `InMemoryStore` implements every repository trait over plain vectors and
// mirrors the cascading deletes of the PostgreSQL schema.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::assistant::errors::{AssistantError, AssistantResult};
use crate::assistant::executor::QueryExecutor;
use crate::assistant::llm::LanguageModel;
use crate::assistant::sql_guard::ReadOnlyQuery;
use crate::domain::catalog::{CatalogEntry, CatalogKind, CatalogName, Locality};
use crate::domain::census::{DwellingSummary, Inhabitant, NewDwelling, NewInhabitant, Sex};
use crate::domain::errors::{CensusError, CensusResult};
use crate::domain::reports::{HousingTypeCount, LocalityStatistics, LocationFilter, PopulationRow};
use crate::domain::repositories::{
    AdminRepository, Administrator, CatalogRepository, CensusRepository, LocalityRepository,
    ReportRepository,
};

#[derive(Clone)]
struct StoredLocality {
    id: i32,
    name: String,
    municipality_id: i32,
}

#[derive(Clone)]
struct StoredDwelling {
    id: i32,
    address: String,
    census_date: Option<NaiveDate>,
    gps_coordinates: Option<String>,
    locality_id: i32,
    housing_type_id: i32,
}

#[derive(Default)]
struct Data {
    next_id: i32,
    admins: Vec<Administrator>,
    catalogs: HashMap<CatalogKind, Vec<CatalogEntry>>,
    localities: Vec<StoredLocality>,
    dwellings: Vec<StoredDwelling>,
    inhabitants: Vec<Inhabitant>,
    links: Vec<(i32, i32)>,
}

impl Data {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn catalog(&self, kind: CatalogKind) -> &[CatalogEntry] {
        self.catalogs.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    fn catalog_name(&self, kind: CatalogKind, id: i32) -> String {
        self.catalog(kind)
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    }

    fn locality(&self, id: i32) -> Option<Locality> {
        self.localities.iter().find(|l| l.id == id).map(|l| Locality {
            id: l.id,
            name: l.name.clone(),
            municipality_id: l.municipality_id,
            municipality_name: self.catalog_name(CatalogKind::Municipality, l.municipality_id),
        })
    }

    fn summary(&self, d: &StoredDwelling) -> DwellingSummary {
        let locality = self.locality(d.locality_id);
        DwellingSummary {
            id: d.id,
            address: d.address.clone(),
            census_date: d.census_date,
            gps_coordinates: d.gps_coordinates.clone(),
            locality_id: d.locality_id,
            locality_name: locality.as_ref().map(|l| l.name.clone()).unwrap_or_default(),
            municipality_id: locality.as_ref().map(|l| l.municipality_id).unwrap_or_default(),
            municipality_name: locality.map(|l| l.municipality_name).unwrap_or_default(),
            housing_type_id: d.housing_type_id,
            housing_type_name: self.catalog_name(CatalogKind::HousingType, d.housing_type_id),
            inhabitant_count: self
                .inhabitants
                .iter()
                .filter(|h| h.dwelling_id == d.id)
                .count() as i64,
        }
    }

    fn remove_dwellings(&mut self, doomed: impl Fn(&StoredDwelling) -> bool) {
        let ids: Vec<i32> = self
            .dwellings
            .iter()
            .filter(|&d| doomed(d))
            .map(|d| d.id)
            .collect();
        self.dwellings.retain(|d| !ids.contains(&d.id));
        self.inhabitants.retain(|h| !ids.contains(&h.dwelling_id));
        self.links.retain(|(dwelling, _)| !ids.contains(dwelling));
    }

    fn remove_localities(&mut self, doomed: impl Fn(&StoredLocality) -> bool) {
        let ids: Vec<i32> = self
            .localities
            .iter()
            .filter(|&l| doomed(l))
            .map(|l| l.id)
            .collect();
        self.localities.retain(|l| !ids.contains(&l.id));
        self.remove_dwellings(|d| ids.contains(&d.locality_id));
    }

    /// Inhabitants matching a normalized location filter, with their dwelling
    fn filtered_inhabitants(&self, filter: LocationFilter) -> Vec<(&Inhabitant, &StoredDwelling)> {
        self.inhabitants
            .iter()
            .filter_map(|h| {
                let dwelling = self.dwellings.iter().find(|d| d.id == h.dwelling_id)?;
                let locality = self.locality(dwelling.locality_id)?;
                let keep = filter.locality_id.map_or(true, |id| id == locality.id)
                    && filter
                        .municipality_id
                        .map_or(true, |id| id == locality.municipality_id);
                keep.then_some((h, dwelling))
            })
            .collect()
    }
}

/// Repository fake backed by vectors behind a mutex
#[derive(Default)]
pub struct InMemoryStore {
    data: Mutex<Data>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn data(&self) -> MutexGuard<'_, Data> {
        self.data.lock().unwrap()
    }

    pub fn add_catalog(&self, kind: CatalogKind, name: &str) -> i32 {
        let mut data = self.data();
        let id = data.next_id();
        data.catalogs.entry(kind).or_default().push(CatalogEntry {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn add_locality(&self, name: &str, municipality_id: i32) -> i32 {
        let mut data = self.data();
        let id = data.next_id();
        data.localities.push(StoredLocality {
            id,
            name: name.to_string(),
            municipality_id,
        });
        id
    }

    pub fn add_dwelling(&self, address: &str, locality_id: i32, housing_type_id: i32) -> i32 {
        let mut data = self.data();
        let id = data.next_id();
        data.dwellings.push(StoredDwelling {
            id,
            address: address.to_string(),
            census_date: NaiveDate::from_ymd_opt(2025, 10, 25),
            gps_coordinates: None,
            locality_id,
            housing_type_id,
        });
        id
    }

    pub fn add_inhabitant(&self, dwelling_id: i32, name: &str, age: i32, sex: Sex) -> i32 {
        let mut data = self.data();
        let id = data.next_id();
        data.inhabitants.push(Inhabitant {
            id,
            dwelling_id,
            full_name: name.to_string(),
            age,
            sex,
            relationship_to_head: "No especificado".to_string(),
        });
        id
    }

    pub fn activity_link_count(&self) -> usize {
        self.data().links.len()
    }
}

#[async_trait]
impl AdminRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> CensusResult<Option<Administrator>> {
        Ok(self
            .data()
            .admins
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> CensusResult<Administrator> {
        let mut data = self.data();
        if data.admins.iter().any(|a| a.username == username) {
            return Err(CensusError::conflict(format!(
                "Administrator '{}' already exists",
                username
            )));
        }
        let admin = Administrator {
            id: data.next_id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        data.admins.push(admin.clone());
        Ok(admin)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn list(&self, kind: CatalogKind) -> CensusResult<Vec<CatalogEntry>> {
        let mut entries = self.data().catalog(kind).to_vec();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn find_by_id(&self, kind: CatalogKind, id: i32) -> CensusResult<Option<CatalogEntry>> {
        Ok(self.data().catalog(kind).iter().find(|e| e.id == id).cloned())
    }

    async fn insert(&self, kind: CatalogKind, name: &CatalogName) -> CensusResult<CatalogEntry> {
        let mut data = self.data();
        if data.catalog(kind).iter().any(|e| e.name == name.as_str()) {
            return Err(CensusError::conflict(format!("{} '{}' already exists", kind, name)));
        }
        let entry = CatalogEntry {
            id: data.next_id(),
            name: name.as_str().to_string(),
        };
        data.catalogs.entry(kind).or_default().push(entry.clone());
        Ok(entry)
    }

    async fn rename(
        &self,
        kind: CatalogKind,
        id: i32,
        name: &CatalogName,
    ) -> CensusResult<Option<CatalogEntry>> {
        let mut data = self.data();
        if data
            .catalog(kind)
            .iter()
            .any(|e| e.id != id && e.name == name.as_str())
        {
            return Err(CensusError::conflict(format!("{} '{}' already exists", kind, name)));
        }
        let entries = data.catalogs.entry(kind).or_default();
        Ok(entries.iter_mut().find(|e| e.id == id).map(|e| {
            e.name = name.as_str().to_string();
            e.clone()
        }))
    }

    async fn delete(&self, kind: CatalogKind, id: i32) -> CensusResult<bool> {
        let mut data = self.data();
        let entries = data.catalogs.entry(kind).or_default();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        match kind {
            CatalogKind::Municipality => data.remove_localities(|l| l.municipality_id == id),
            CatalogKind::HousingType => data.remove_dwellings(|d| d.housing_type_id == id),
            CatalogKind::EconomicActivity => data.links.retain(|(_, activity)| *activity != id),
        }
        Ok(true)
    }
}

#[async_trait]
impl LocalityRepository for InMemoryStore {
    async fn list_all(&self) -> CensusResult<Vec<Locality>> {
        let data = self.data();
        let mut localities: Vec<Locality> = data
            .localities
            .iter()
            .filter_map(|l| data.locality(l.id))
            .collect();
        localities.sort_by(|a, b| {
            (&a.municipality_name, &a.name).cmp(&(&b.municipality_name, &b.name))
        });
        Ok(localities)
    }

    async fn list_by_municipality(&self, municipality_id: i32) -> CensusResult<Vec<Locality>> {
        let mut localities: Vec<Locality> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|l| l.municipality_id == municipality_id)
            .collect();
        localities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(localities)
    }

    async fn find_by_id(&self, id: i32) -> CensusResult<Option<Locality>> {
        Ok(self.data().locality(id))
    }

    async fn insert(&self, name: &CatalogName, municipality_id: i32) -> CensusResult<Locality> {
        let id = self.add_locality(name.as_str(), municipality_id);
        Ok(self.data().locality(id).expect("locality just inserted"))
    }

    async fn update(
        &self,
        id: i32,
        name: &CatalogName,
        municipality_id: i32,
    ) -> CensusResult<Option<Locality>> {
        let mut data = self.data();
        let Some(stored) = data.localities.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        stored.name = name.as_str().to_string();
        stored.municipality_id = municipality_id;
        Ok(data.locality(id))
    }

    async fn delete(&self, id: i32) -> CensusResult<bool> {
        let mut data = self.data();
        let existed = data.localities.iter().any(|l| l.id == id);
        data.remove_localities(|l| l.id == id);
        Ok(existed)
    }
}

#[async_trait]
impl CensusRepository for InMemoryStore {
    async fn list_dwellings(&self) -> CensusResult<Vec<DwellingSummary>> {
        let data = self.data();
        Ok(data.dwellings.iter().map(|d| data.summary(d)).collect())
    }

    async fn find_dwelling(&self, id: i32) -> CensusResult<Option<DwellingSummary>> {
        let data = self.data();
        Ok(data
            .dwellings
            .iter()
            .find(|d| d.id == id)
            .map(|d| data.summary(d)))
    }

    async fn insert_dwelling(&self, dwelling: &NewDwelling) -> CensusResult<i32> {
        let mut data = self.data();
        let id = data.next_id();
        data.dwellings.push(StoredDwelling {
            id,
            address: dwelling.address().to_string(),
            census_date: Some(dwelling.census_date()),
            gps_coordinates: dwelling.gps_coordinates().map(str::to_string),
            locality_id: dwelling.locality_id(),
            housing_type_id: dwelling.housing_type_id(),
        });
        Ok(id)
    }

    async fn update_dwelling(&self, id: i32, dwelling: &NewDwelling) -> CensusResult<bool> {
        let mut data = self.data();
        let Some(stored) = data.dwellings.iter_mut().find(|d| d.id == id) else {
            return Ok(false);
        };
        stored.address = dwelling.address().to_string();
        stored.census_date = Some(dwelling.census_date());
        stored.gps_coordinates = dwelling.gps_coordinates().map(str::to_string);
        stored.locality_id = dwelling.locality_id();
        stored.housing_type_id = dwelling.housing_type_id();
        Ok(true)
    }

    async fn delete_dwelling(&self, id: i32) -> CensusResult<bool> {
        let mut data = self.data();
        let existed = data.dwellings.iter().any(|d| d.id == id);
        data.remove_dwellings(|d| d.id == id);
        Ok(existed)
    }

    async fn list_inhabitants(&self, dwelling_id: i32) -> CensusResult<Vec<Inhabitant>> {
        Ok(self
            .data()
            .inhabitants
            .iter()
            .filter(|h| h.dwelling_id == dwelling_id)
            .cloned()
            .collect())
    }

    async fn find_inhabitant(&self, id: i32) -> CensusResult<Option<Inhabitant>> {
        Ok(self.data().inhabitants.iter().find(|h| h.id == id).cloned())
    }

    async fn insert_inhabitant(
        &self,
        dwelling_id: i32,
        inhabitant: &NewInhabitant,
    ) -> CensusResult<Inhabitant> {
        let mut data = self.data();
        let stored = Inhabitant {
            id: data.next_id(),
            dwelling_id,
            full_name: inhabitant.full_name().to_string(),
            age: inhabitant.age(),
            sex: inhabitant.sex(),
            relationship_to_head: inhabitant.relationship_to_head().to_string(),
        };
        data.inhabitants.push(stored.clone());
        Ok(stored)
    }

    async fn update_inhabitant(
        &self,
        id: i32,
        inhabitant: &NewInhabitant,
    ) -> CensusResult<Option<Inhabitant>> {
        let mut data = self.data();
        Ok(data.inhabitants.iter_mut().find(|h| h.id == id).map(|h| {
            h.full_name = inhabitant.full_name().to_string();
            h.age = inhabitant.age();
            h.sex = inhabitant.sex();
            h.relationship_to_head = inhabitant.relationship_to_head().to_string();
            h.clone()
        }))
    }

    async fn delete_inhabitant(&self, id: i32) -> CensusResult<bool> {
        let mut data = self.data();
        let before = data.inhabitants.len();
        data.inhabitants.retain(|h| h.id != id);
        Ok(data.inhabitants.len() != before)
    }

    async fn list_activities(&self, dwelling_id: i32) -> CensusResult<Vec<CatalogEntry>> {
        let data = self.data();
        let mut activities: Vec<CatalogEntry> = data
            .catalog(CatalogKind::EconomicActivity)
            .iter()
            .filter(|a| data.links.contains(&(dwelling_id, a.id)))
            .cloned()
            .collect();
        activities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(activities)
    }

    async fn add_activity(&self, dwelling_id: i32, activity_id: i32) -> CensusResult<bool> {
        let mut data = self.data();
        if data.links.contains(&(dwelling_id, activity_id)) {
            return Ok(false);
        }
        data.links.push((dwelling_id, activity_id));
        Ok(true)
    }

    async fn remove_activity(&self, dwelling_id: i32, activity_id: i32) -> CensusResult<bool> {
        let mut data = self.data();
        let before = data.links.len();
        data.links.retain(|link| *link != (dwelling_id, activity_id));
        Ok(data.links.len() != before)
    }
}

#[async_trait]
impl ReportRepository for InMemoryStore {
    async fn population_by_location(&self, filter: LocationFilter) -> CensusResult<Vec<PopulationRow>> {
        let data = self.data();
        let mut groups: BTreeMap<(String, String), i64> = BTreeMap::new();
        for (_, dwelling) in data.filtered_inhabitants(filter) {
            if let Some(locality) = data.locality(dwelling.locality_id) {
                *groups
                    .entry((locality.municipality_name, locality.name))
                    .or_default() += 1;
            }
        }
        Ok(groups
            .into_iter()
            .map(|((municipality, locality), total_inhabitants)| PopulationRow {
                municipality,
                locality,
                total_inhabitants,
            })
            .collect())
    }

    async fn inhabitants_by_housing_type(
        &self,
        filter: LocationFilter,
    ) -> CensusResult<Vec<HousingTypeCount>> {
        let data = self.data();
        let mut groups: BTreeMap<String, i64> = BTreeMap::new();
        for (_, dwelling) in data.filtered_inhabitants(filter) {
            let name = data.catalog_name(CatalogKind::HousingType, dwelling.housing_type_id);
            *groups.entry(name).or_default() += 1;
        }
        Ok(groups
            .into_iter()
            .map(|(housing_type, inhabitants)| HousingTypeCount {
                housing_type,
                inhabitants,
            })
            .collect())
    }

    async fn ages(&self, filter: LocationFilter) -> CensusResult<Vec<i32>> {
        let data = self.data();
        let mut ages: Vec<i32> = data
            .filtered_inhabitants(filter)
            .into_iter()
            .map(|(h, _)| h.age)
            .collect();
        ages.sort_unstable();
        Ok(ages)
    }

    async fn locality_statistics(&self) -> CensusResult<Vec<LocalityStatistics>> {
        let data = self.data();
        let mut stats: Vec<LocalityStatistics> = data
            .localities
            .iter()
            .filter_map(|l| data.locality(l.id))
            .map(|locality| {
                let dwellings: Vec<i32> = data
                    .dwellings
                    .iter()
                    .filter(|d| d.locality_id == locality.id)
                    .map(|d| d.id)
                    .collect();
                let ages: Vec<i32> = data
                    .inhabitants
                    .iter()
                    .filter(|h| dwellings.contains(&h.dwelling_id))
                    .map(|h| h.age)
                    .collect();
                let population = Decimal::from(ages.len() as i64);

                LocalityStatistics {
                    locality: locality.name,
                    municipality: locality.municipality_name,
                    total_population: ages.len() as i64,
                    average_age: (!ages.is_empty()).then(|| {
                        let sum: i64 = ages.iter().map(|&a| i64::from(a)).sum();
                        (Decimal::from(sum) / population).round_dp(2)
                    }),
                    average_inhabitants_per_dwelling: (!dwellings.is_empty()).then(|| {
                        (population / Decimal::from(dwellings.len() as i64)).round_dp(2)
                    }),
                }
            })
            .collect();
        stats.sort_by(|a, b| (&a.municipality, &a.locality).cmp(&(&b.municipality, &b.locality)));
        Ok(stats)
    }
}

/// Language model that replays scripted replies and records prompts
pub struct FakeLanguageModel {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLanguageModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeLanguageModel {
    async fn generate(&self, _system: &str, prompt: &str) -> AssistantResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AssistantError::Llm("No scripted reply left".to_string()))
    }
}

/// Query executor returning fixed rows and recording what it ran
pub struct FakeExecutor {
    rows: Vec<Value>,
    executed: Mutex<Vec<(String, u32)>>,
}

impl FakeExecutor {
    pub fn new(rows: Vec<Value>) -> Self {
        Self {
            rows,
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|(sql, _)| sql.clone())
            .collect()
    }

    pub fn row_limits(&self) -> Vec<u32> {
        self.executed
            .lock()
            .unwrap()
            .iter()
            .map(|(_, limit)| *limit)
            .collect()
    }
}

#[async_trait]
impl QueryExecutor for FakeExecutor {
    async fn fetch_json(&self, query: &ReadOnlyQuery, row_limit: u32) -> AssistantResult<Vec<Value>> {
        self.executed
            .lock()
            .unwrap()
            .push((query.as_str().to_string(), row_limit));
        Ok(self.rows.iter().take(row_limit as usize).cloned().collect())
    }
}
