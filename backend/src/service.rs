//! Request-level operations
//!
//! [`CostService`] owns the calculator, the account registry and the session
//! store. Each operation validates a JSON request body, calls into the
//! engine and returns a serializable value or a [`ServiceError`]. Hosts turn
//! results into response bodies with [`respond`].

use chrono::Local;
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::info;

use crate::accounts::{AccountRegistry, AuthError, AuthenticatedUser, SignupRequest};
use crate::config::{ConfigError, EngineConfig};
use crate::costs::{CostCalculator, CostReport, ParameterSet};
use crate::history::{HistoryEntry, SessionStore, UnknownSession};
use crate::insights::{
    sector_statistics, ExampleCompany, Recommendations, ReportSummary, SummaryError,
    ALL_SECTORS, EXAMPLE_COMPANIES, SIMULATED_DOWNLOAD_URL,
};
use crate::models::company::{is_empty_value, CompanyError, CompanyProfile};

/// Reported by [`CostService::health`]
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("Données JSON manquantes")]
    MissingJson,

    #[error("Données manquantes")]
    MissingData,

    #[error("Authentification requise. Veuillez vous connecter.")]
    Unauthenticated,

    #[error("Le champ parametres doit être un objet")]
    InvalidParameters,

    #[error("Exemple d'entreprise introuvable: {0}")]
    ExampleNotFound(usize),

    #[error(transparent)]
    Session(#[from] UnknownSession),

    #[error(transparent)]
    Company(#[from] CompanyError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Summary(#[from] SummaryError),
}

impl ServiceError {
    /// HTTP status a host should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Unauthenticated => 401,
            ServiceError::Session(_) => 401,
            ServiceError::Auth(AuthError::InvalidCredentials) => 401,
            ServiceError::ExampleNotFound(_) => 404,
            _ => 400,
        }
    }
}

// ============================================================================
// ENVELOPES
// ============================================================================

/// `{success: true, ...fields}`. A non-object payload lands under `data`.
pub fn success_body(payload: Value) -> Value {
    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    match payload {
        Value::Object(fields) => body.extend(fields),
        Value::Null => {}
        other => {
            body.insert("data".to_string(), other);
        }
    }
    Value::Object(body)
}

/// `{success: false, error: <message>}`
pub fn error_body(error: &ServiceError) -> Value {
    json!({ "success": false, "error": error.to_string() })
}

/// Status code and response body for an operation result
pub fn respond<T: Serialize>(result: Result<T, ServiceError>) -> (u16, Value) {
    match result {
        Ok(payload) => match serde_json::to_value(payload) {
            Ok(value) => (200, success_body(value)),
            Err(e) => (500, json!({ "success": false, "error": e.to_string() })),
        },
        Err(e) => (e.status_code(), error_body(&e)),
    }
}

// ============================================================================
// SERVICE
// ============================================================================

/// Response of signup and login
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: AuthenticatedUser,
}

/// Response of report generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportResponse {
    pub rapport: ReportSummary,
    pub message: &'static str,
    pub download_url: &'static str,
}

pub struct CostService {
    calculator: CostCalculator,
    accounts: AccountRegistry,
    sessions: SessionStore,
    config: EngineConfig,
}

impl Default for CostService {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            calculator: CostCalculator::with_unit(&config.currency),
            accounts: AccountRegistry::new(&config.accounts),
            sessions: SessionStore::default(),
            config,
        }
    }
}

impl CostService {
    /// Build a service from a configuration, rejecting invalid ones
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            calculator: CostCalculator::with_unit(&config.currency),
            accounts: AccountRegistry::new(&config.accounts),
            sessions: SessionStore::new(config.history.capacity)?,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calculator(&self) -> &CostCalculator {
        &self.calculator
    }

    pub fn accounts(&self) -> &AccountRegistry {
        &self.accounts
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Start an anonymous session
    pub fn open_session(&self) -> String {
        self.sessions.open()
    }

    // ------------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------------

    /// Register an account and log the session in. The session must have
    /// been opened with [`open_session`](Self::open_session).
    pub fn signup(&self, session_id: &str, body: &Value) -> Result<AuthResponse, ServiceError> {
        let fields = request_object(body, ServiceError::MissingJson)?;
        if !self.sessions.contains(session_id) {
            return Err(UnknownSession.into());
        }
        let request = SignupRequest {
            nom_complet: text_field(fields, "nom_complet"),
            email: text_field(fields, "email"),
            password: text_field(fields, "password"),
            confirm_password: text_field(fields, "confirm_password"),
        };

        let user = self.accounts.signup(&request)?;
        self.sessions.login(session_id, user.clone())?;
        Ok(AuthResponse {
            message: "Inscription réussie!",
            user,
        })
    }

    pub fn login(&self, session_id: &str, body: &Value) -> Result<AuthResponse, ServiceError> {
        let fields = request_object(body, ServiceError::MissingJson)?;
        let user = self
            .accounts
            .login(&text_field(fields, "email"), &text_field(fields, "password"))?;
        self.sessions.login(session_id, user.clone())?;
        Ok(AuthResponse {
            message: "Connexion réussie!",
            user,
        })
    }

    /// Clear the session. Succeeds whether or not anyone was logged in.
    pub fn logout(&self, session_id: &str) -> Value {
        let email = self
            .sessions
            .logout(session_id)
            .map(|user| user.email)
            .unwrap_or_else(|| "Inconnu".to_string());
        info!(email = %email, "user logged out");
        json!({ "message": "Déconnexion réussie" })
    }

    /// `{authenticated, user?}`. A session whose account no longer exists
    /// reads as unauthenticated.
    pub fn check_auth(&self, session_id: &str) -> Value {
        match self.authenticated_user(session_id) {
            Some(user) => json!({ "authenticated": true, "user": user }),
            None => json!({ "authenticated": false }),
        }
    }

    fn authenticated_user(&self, session_id: &str) -> Option<AuthenticatedUser> {
        self.sessions
            .current_user(session_id)
            .filter(|user| self.accounts.contains(&user.email))
    }

    fn require_user(&self, session_id: &str) -> Result<AuthenticatedUser, ServiceError> {
        self.authenticated_user(session_id)
            .ok_or(ServiceError::Unauthenticated)
    }

    // ------------------------------------------------------------------------
    // Calculation and history
    // ------------------------------------------------------------------------

    /// Compute the hidden costs for the company in `body` and record the
    /// result in the session history.
    pub fn calculate(&self, session_id: &str, body: &Value) -> Result<CostReport, ServiceError> {
        let user = self.require_user(session_id)?;
        let fields = request_object(body, ServiceError::MissingData)?;

        let company = CompanyProfile::from_request(fields)?;
        let params = match fields.get("parametres") {
            None | Some(Value::Null) => ParameterSet::new(),
            Some(Value::Object(map)) => ParameterSet::from_json_map(map),
            Some(_) => return Err(ServiceError::InvalidParameters),
        };

        let report = self.calculator.calculate_total_costs(&company, &params);
        self.sessions.record(session_id, &report, &user.id)?;

        info!(
            company = %company.name(),
            user = %user.email,
            total = report.total_general(),
            "calculation completed"
        );
        Ok(report)
    }

    /// History of the session's user, newest first. Empty when nobody is
    /// logged in.
    pub fn history(&self, session_id: &str) -> Vec<HistoryEntry> {
        match self.sessions.current_user(session_id) {
            Some(user) => self.sessions.history_for(session_id, &user.id),
            None => Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Reference content
    // ------------------------------------------------------------------------

    /// Formula catalog as `{couts_erreurs, couts_resistance, couts_imprevus}`
    pub fn definitions(&self) -> Value {
        self.calculator.catalog().to_json()
    }

    pub fn examples(&self) -> &'static [ExampleCompany] {
        &EXAMPLE_COMPANIES
    }

    /// Example company by position in [`examples`](Self::examples)
    pub fn example(&self, index: usize) -> Result<&'static ExampleCompany, ServiceError> {
        EXAMPLE_COMPANIES
            .get(index)
            .ok_or(ServiceError::ExampleNotFound(index))
    }

    /// `{secteur, statistiques}`. No sector means the all-sectors aggregate.
    pub fn sector_statistics(&self, sector: Option<&str>) -> Value {
        let sector = sector.unwrap_or(ALL_SECTORS);
        json!({
            "secteur": sector,
            "statistiques": sector_statistics(sector),
        })
    }

    /// Recommendations for `body.resultats`
    pub fn recommendations(&self, body: &Value) -> Result<Recommendations, ServiceError> {
        let resultats = results_field(body)?;
        Ok(Recommendations::from_json(resultats))
    }

    /// Summary of `body.resultats` for the logged-in user
    pub fn report(&self, session_id: &str, body: &Value) -> Result<ReportResponse, ServiceError> {
        let user = self.require_user(session_id)?;
        let resultats = results_field(body)?;
        let rapport = ReportSummary::build(resultats, &user.full_name, Local::now().naive_local())?;

        info!(user = %user.email, "report generated");
        Ok(ReportResponse {
            rapport,
            message: "Rapport généré avec succès",
            download_url: SIMULATED_DOWNLOAD_URL,
        })
    }

    pub fn health(&self) -> Value {
        json!({
            "status": "healthy",
            "timestamp": Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            "version": SERVICE_VERSION,
            "users_count": self.accounts.len(),
        })
    }
}

// ============================================================================
// REQUEST HELPERS
// ============================================================================

fn request_object<'a>(
    body: &'a Value,
    missing: ServiceError,
) -> Result<&'a Map<String, Value>, ServiceError> {
    match body {
        Value::Object(fields) if !fields.is_empty() => Ok(fields),
        _ => Err(missing),
    }
}

/// String field, or empty when absent or not a string
fn text_field(fields: &Map<String, Value>, name: &str) -> String {
    fields
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn results_field(body: &Value) -> Result<&Value, ServiceError> {
    match body.get("resultats") {
        Some(resultats) if !is_empty_value(resultats) => Ok(resultats),
        _ => Err(SummaryError::MissingResults.into()),
    }
}
