use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use loanportal_client::{
    AuthToken, Dashboard, DeleteAck, LoanGateway, MemorySessionStore, PortalError, Session,
    StatusFilter, ViewMode,
};
use loanportal_core::{Loan, LoanId, LoanStatus, Role, User};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    All,
    ByUser(String),
    Expired,
    Delete(String),
}

/// Gateway double that records every call and serves canned collections.
#[derive(Default)]
struct RecordingGateway {
    calls: Mutex<Vec<Call>>,
    all: Mutex<Vec<Loan>>,
    mine: Vec<Loan>,
    expired: Vec<Loan>,
    fail_next: Mutex<Option<PortalError>>,
}

impl RecordingGateway {
    fn with_all(loans: Vec<Loan>) -> Self {
        Self {
            all: Mutex::new(loans),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn fail_next(&self, err: PortalError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    fn record(&self, call: Call) -> Result<(), PortalError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LoanGateway for RecordingGateway {
    async fn fetch_all(&self, _token: &AuthToken) -> Result<Vec<Loan>, PortalError> {
        self.record(Call::All)?;
        Ok(self.all.lock().unwrap().clone())
    }

    async fn fetch_by_user(&self, _token: &AuthToken, email: &str) -> Result<Vec<Loan>, PortalError> {
        self.record(Call::ByUser(email.to_string()))?;
        Ok(self.mine.clone())
    }

    async fn fetch_expired(&self, _token: &AuthToken) -> Result<Vec<Loan>, PortalError> {
        self.record(Call::Expired)?;
        Ok(self.expired.clone())
    }

    async fn delete(&self, _token: &AuthToken, loan_id: &LoanId) -> Result<DeleteAck, PortalError> {
        self.record(Call::Delete(loan_id.to_string()))?;
        self.all.lock().unwrap().retain(|l| &l.id != loan_id);
        Ok(DeleteAck {
            message: Some("Loan deleted".to_string()),
            id: Some(loan_id.clone()),
        })
    }
}

fn loan(id: &str, status: LoanStatus, total_loan: Option<f64>) -> Loan {
    Loan {
        id: id.parse().unwrap(),
        user_email: "owner@example.com".to_string(),
        amount: 1000.0,
        total_loan,
        status,
        interest_rate: 5.0,
        maturity_date: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
        application_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        purpose: "Expansion".to_string(),
    }
}

fn session(role: Role) -> Session {
    Session {
        user: User {
            id: "u-1".parse().unwrap(),
            email: "viewer@example.com".to_string(),
            name: "Viewer".to_string(),
            role,
        },
        token: AuthToken::new("tok"),
    }
}

fn scenario_raw() -> Vec<Loan> {
    vec![
        loan("1", LoanStatus::Pending, Some(9000.0)),
        loan("2", LoanStatus::Active, None),
    ]
}

#[tokio::test]
async fn open_requires_a_session() {
    let store = MemorySessionStore::new();
    let err = Dashboard::open(RecordingGateway::default(), &store).err().unwrap();
    assert!(matches!(err, PortalError::Auth(_)));
}

#[tokio::test]
async fn start_fetches_all_once() {
    let mut dash = Dashboard::new(RecordingGateway::with_all(scenario_raw()), session(Role::Admin));
    dash.start().await.unwrap();

    assert_eq!(dash.gateway().calls(), vec![Call::All]);
    assert_eq!(dash.view_mode(), ViewMode::All);
    assert_eq!(dash.displayed().len(), 2);
}

#[tokio::test]
async fn all_to_my_loans_and_back_issues_two_fetches() {
    let mut dash = Dashboard::new(RecordingGateway::with_all(scenario_raw()), session(Role::Staff));
    dash.start().await.unwrap();
    dash.filter_status(StatusFilter::Only(LoanStatus::Pending));

    dash.switch_view(ViewMode::MyLoans).await.unwrap();
    assert_eq!(dash.status_filter(), StatusFilter::All);

    dash.switch_view(ViewMode::All).await.unwrap();
    assert_eq!(dash.status_filter(), StatusFilter::All);

    assert_eq!(
        dash.gateway().calls(),
        vec![
            Call::All,
            Call::ByUser("viewer@example.com".to_string()),
            Call::All
        ]
    );
}

#[tokio::test]
async fn reselecting_the_active_view_does_not_refetch() {
    let mut dash = Dashboard::new(RecordingGateway::default(), session(Role::Staff));
    dash.start().await.unwrap();
    dash.switch_view(ViewMode::All).await.unwrap();

    assert_eq!(dash.gateway().calls(), vec![Call::All]);
}

#[tokio::test]
async fn staff_filtering_masks_total_loan() {
    let mut dash = Dashboard::new(RecordingGateway::with_all(scenario_raw()), session(Role::Staff));
    dash.start().await.unwrap();
    assert!(dash.filter_status(StatusFilter::Only(LoanStatus::Pending)));

    let json = serde_json::to_value(dash.displayed()).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "1");
    assert_eq!(rows[0]["status"], "pending");
    assert!(rows[0].get("totalLoan").is_none());

    // Filtering never goes to the network.
    assert_eq!(dash.gateway().calls(), vec![Call::All]);
}

#[tokio::test]
async fn superadmin_sees_total_loan() {
    let mut dash = Dashboard::new(RecordingGateway::with_all(scenario_raw()), session(Role::Superadmin));
    dash.start().await.unwrap();

    let shown = dash.displayed();
    assert_eq!(shown.len(), 2);
    assert_eq!(shown[0].total_loan, Some(9000.0));
}

#[tokio::test]
async fn staff_delete_is_rejected_without_a_request() {
    let mut dash = Dashboard::new(RecordingGateway::with_all(scenario_raw()), session(Role::Staff));
    dash.start().await.unwrap();

    let err = dash.delete_loan(&"1".parse().unwrap()).await.unwrap_err();
    assert!(matches!(err, PortalError::Authorization(_)));
    assert_eq!(dash.gateway().calls(), vec![Call::All]);
}

#[tokio::test]
async fn admin_delete_is_rejected_without_a_request() {
    let mut dash = Dashboard::new(RecordingGateway::with_all(scenario_raw()), session(Role::Admin));
    dash.start().await.unwrap();

    let err = dash.delete_loan(&"1".parse().unwrap()).await.unwrap_err();
    assert!(matches!(err, PortalError::Authorization(_)));
    assert_eq!(dash.gateway().calls(), vec![Call::All]);
}

#[tokio::test]
async fn superadmin_delete_refetches_current_view_once() {
    let mut dash = Dashboard::new(RecordingGateway::with_all(scenario_raw()), session(Role::Superadmin));
    dash.start().await.unwrap();

    let ack = dash.delete_loan(&"1".parse().unwrap()).await.unwrap();
    assert_eq!(ack.id.unwrap().as_str(), "1");

    assert_eq!(
        dash.gateway().calls(),
        vec![Call::All, Call::Delete("1".to_string()), Call::All]
    );
    let shown = dash.displayed();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].id.as_str(), "2");
}

#[tokio::test]
async fn delete_in_expired_view_refetches_expired() {
    let mut dash = Dashboard::new(RecordingGateway::default(), session(Role::Superadmin));
    dash.start().await.unwrap();
    dash.switch_view(ViewMode::Expired).await.unwrap();

    dash.delete_loan(&"7".parse().unwrap()).await.unwrap();
    assert_eq!(
        dash.gateway().calls(),
        vec![Call::All, Call::Expired, Call::Delete("7".to_string()), Call::Expired]
    );
}

#[tokio::test]
async fn failed_fetch_keeps_prior_records_and_flags_error() {
    let mut dash = Dashboard::new(RecordingGateway::with_all(scenario_raw()), session(Role::Admin));
    dash.start().await.unwrap();
    let before = dash.displayed();

    dash.gateway().fail_next(PortalError::server(Some(503), "unavailable"));
    let err = dash.switch_view(ViewMode::Expired).await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(dash.displayed(), before);
    assert_eq!(dash.last_error(), Some(&err));
    assert!(!dash.is_loading());

    dash.refresh().await.unwrap();
    assert!(dash.last_error().is_none());
}

#[tokio::test]
async fn failed_delete_keeps_records_and_skips_refetch() {
    let mut dash = Dashboard::new(RecordingGateway::with_all(scenario_raw()), session(Role::Superadmin));
    dash.start().await.unwrap();

    dash.gateway().fail_next(PortalError::Network("reset".to_string()));
    let err = dash.delete_loan(&"1".parse().unwrap()).await.unwrap_err();

    assert!(matches!(err, PortalError::Network(_)));
    assert_eq!(dash.displayed().len(), 2);
    assert_eq!(
        dash.gateway().calls(),
        vec![Call::All, Call::Delete("1".to_string())]
    );
}
