//! In-memory stores and a scripted weather provider for tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use serde_json::json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    crops::{
        repo::CropStore,
        repo_types::{CropRecord, NewCrop},
    },
    error::StoreError,
    weather::{
        client::{WeatherError, WeatherProvider},
        dto::WeatherSnapshot,
    },
};

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn insert(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            location: new_user.location,
            soil_type: new_user.soil_type,
            farm_size: new_user.farm_size,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.users.lock().unwrap().len() as i64)
    }
}

#[derive(Default)]
pub struct MemoryCropStore {
    crops: Mutex<Vec<CropRecord>>,
}

#[async_trait]
impl CropStore for MemoryCropStore {
    async fn list_all(&self) -> Result<Vec<CropRecord>, StoreError> {
        Ok(self.crops.lock().unwrap().clone())
    }

    async fn create(&self, new_crop: NewCrop) -> Result<CropRecord, StoreError> {
        let now = OffsetDateTime::now_utc();
        let crop = CropRecord {
            id: Uuid::new_v4(),
            user_id: new_crop.user_id,
            soil_type: new_crop.soil_type,
            season: new_crop.season,
            location: new_crop.location,
            recommended_crops: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.crops.lock().unwrap().push(crop.clone());
        Ok(crop)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.crops.lock().unwrap().len() as i64)
    }
}

/// Answers every city with a fixed temperature, or always fails; counts calls.
pub struct ScriptedWeather {
    temperature: Option<f64>,
    calls: AtomicUsize,
}

impl ScriptedWeather {
    pub fn temperature(celsius: f64) -> Self {
        Self {
            temperature: Some(celsius),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            temperature: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for ScriptedWeather {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.temperature {
            Some(temperature) => Ok(WeatherSnapshot {
                city: city.to_string(),
                temperature,
                humidity: 55,
                description: "scattered clouds".into(),
            }),
            None => Err(WeatherError::Status {
                status: 404,
                body: json!({"cod": "404", "message": "city not found"}),
            }),
        }
    }
}
