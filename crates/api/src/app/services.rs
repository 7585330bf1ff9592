//! In-memory backing services: user directory, loan store, token issuer.

use std::sync::{PoisonError, RwLock};

use chrono::{Duration, NaiveDate};
use sha2::{Digest, Sha256};

use loanportal_auth::Hs256JwtIssuer;
use loanportal_core::{Loan, LoanId, LoanStatus, Role, User, UserId};

use crate::config::ApiConfig;

/// Password shared by the seeded demo accounts.
pub const DEMO_PASSWORD: &str = "password123";

pub struct AppServices {
    pub users: UserDirectory,
    pub loans: LoanStore,
    pub issuer: Hs256JwtIssuer,
    pub token_ttl: Duration,
    pub remember_me_ttl: Duration,
}

impl AppServices {
    pub fn new(config: &ApiConfig, users: UserDirectory, loans: LoanStore) -> Self {
        Self {
            users,
            loans,
            issuer: Hs256JwtIssuer::new(config.jwt_secret.as_bytes()),
            token_ttl: config.token_ttl,
            remember_me_ttl: config.remember_me_ttl,
        }
    }

    /// Services backed by the demo accounts and sample loans, with maturity
    /// dates laid out around `today`.
    pub fn seeded(config: &ApiConfig, today: NaiveDate) -> Self {
        Self::new(config, UserDirectory::demo(), LoanStore::new(seed_loans(today)))
    }

    pub fn ttl(&self, remember_me: bool) -> Duration {
        if remember_me { self.remember_me_ttl } else { self.token_ttl }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

struct Account {
    user: User,
    password_sha256: Vec<u8>,
}

/// Accounts keyed by email; passwords are held only as SHA-256 digests.
pub struct UserDirectory {
    accounts: RwLock<Vec<Account>>,
}

/// Registration failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    EmailTaken,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(Vec::new()),
        }
    }

    pub fn with_account(self, user: User, password: &str) -> Self {
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Account {
                user,
                password_sha256: digest(password),
            });
        self
    }

    pub fn demo() -> Self {
        [
            ("staff@teamachieve.com", "Sam Staff", Role::Staff),
            ("admin@teamachieve.com", "Ada Admin", Role::Admin),
            ("superadmin@teamachieve.com", "Sol Superadmin", Role::Superadmin),
            ("demo@teamachieve.com", "Dee Demo", Role::Staff),
        ]
        .into_iter()
        .fold(Self::new(), |dir, (email, name, role)| {
            let user = User {
                id: UserId::new(),
                email: email.to_string(),
                name: name.to_string(),
                role,
            };
            dir.with_account(user, DEMO_PASSWORD)
        })
    }

    /// Look up by case-insensitive email and check the password digest.
    pub fn verify(&self, email: &str, password: &str) -> Option<User> {
        let candidate = digest(password);
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email))
            .filter(|a| a.password_sha256 == candidate)
            .map(|a| a.user.clone())
    }

    /// Create a staff account. Emails are unique ignoring ASCII case.
    pub fn register(&self, name: String, email: &str, password: &str) -> Result<User, RegisterError> {
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        if accounts.iter().any(|a| a.user.email.eq_ignore_ascii_case(email)) {
            return Err(RegisterError::EmailTaken);
        }

        let user = User {
            id: UserId::new(),
            email: email.to_string(),
            name,
            role: Role::Staff,
        };
        accounts.push(Account {
            user: user.clone(),
            password_sha256: digest(password),
        });
        Ok(user)
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn digest(password: &str) -> Vec<u8> {
    Sha256::digest(password.as_bytes()).to_vec()
}

// ─────────────────────────────────────────────────────────────────────────────
// Loans
// ─────────────────────────────────────────────────────────────────────────────

/// Loan records behind a lock; reads return owned snapshots.
pub struct LoanStore {
    loans: RwLock<Vec<Loan>>,
}

impl LoanStore {
    pub fn new(loans: Vec<Loan>) -> Self {
        Self {
            loans: RwLock::new(loans),
        }
    }

    pub fn all(&self) -> Vec<Loan> {
        self.loans.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn by_user(&self, email: &str) -> Vec<Loan> {
        let email = email.trim();
        self.loans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|l| l.user_email.eq_ignore_ascii_case(email))
            .cloned()
            .collect()
    }

    /// Loans whose maturity date is strictly before `today`.
    pub fn expired(&self, today: NaiveDate) -> Vec<Loan> {
        self.loans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|l| l.is_expired(today))
            .cloned()
            .collect()
    }

    /// Remove a loan by id, returning it if it existed.
    pub fn delete(&self, id: &LoanId) -> Option<Loan> {
        let mut loans = self.loans.write().unwrap_or_else(PoisonError::into_inner);
        let pos = loans.iter().position(|l| &l.id == id)?;
        Some(loans.remove(pos))
    }
}

pub fn seed_loans(today: NaiveDate) -> Vec<Loan> {
    let loan = |email: &str,
                amount: f64,
                total_loan: f64,
                status: LoanStatus,
                rate: f64,
                applied_days_ago: i64,
                matures_in_days: i64,
                purpose: &str| Loan {
        id: LoanId::new(),
        user_email: email.to_string(),
        amount,
        total_loan: Some(total_loan),
        status,
        interest_rate: rate,
        maturity_date: today + Duration::days(matures_in_days),
        application_date: today - Duration::days(applied_days_ago),
        purpose: purpose.to_string(),
    };

    vec![
        loan("staff@teamachieve.com", 12_000.0, 13_440.0, LoanStatus::Active, 6.0, 120, 240, "Car purchase"),
        loan("staff@teamachieve.com", 3_500.0, 3_675.0, LoanStatus::Completed, 5.0, 400, -35, "Laptop"),
        loan("demo@teamachieve.com", 25_000.0, 29_500.0, LoanStatus::Pending, 9.0, 3, 720, "Home renovation"),
        loan("demo@teamachieve.com", 8_000.0, 8_720.0, LoanStatus::Active, 4.5, 300, -10, "Tuition"),
        loan("admin@teamachieve.com", 50_000.0, 61_000.0, LoanStatus::Rejected, 11.0, 20, 1_080, "Business expansion"),
        loan("jane.doe@example.com", 1_500.0, 1_590.0, LoanStatus::Completed, 3.0, 500, -120, "Medical bills"),
        loan("jane.doe@example.com", 15_750.5, 17_010.54, LoanStatus::Active, 4.0, 60, 365, "Debt consolidation"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    #[test]
    fn verify_checks_digest_and_ignores_email_case() {
        let users = UserDirectory::demo();
        let user = users.verify("ADMIN@teamachieve.com", DEMO_PASSWORD).unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(users.verify("admin@teamachieve.com", "wrong-password").is_none());
        assert!(users.verify("nobody@teamachieve.com", DEMO_PASSWORD).is_none());
    }

    #[test]
    fn registered_account_can_sign_in_once() {
        let users = UserDirectory::demo();
        let user = users
            .register("Ana Lima".to_string(), "ana@example.com", "longenough")
            .unwrap();
        assert_eq!(user.role, Role::Staff);
        assert_eq!(users.verify("ana@example.com", "longenough"), Some(user));

        assert_eq!(
            users.register("Other".to_string(), "ANA@example.com", "whatever1"),
            Err(RegisterError::EmailTaken)
        );
        assert_eq!(
            users.register("Demo".to_string(), "demo@teamachieve.com", "whatever1"),
            Err(RegisterError::EmailTaken)
        );
    }

    #[test]
    fn expired_uses_strict_comparison() {
        let store = LoanStore::new(seed_loans(today()));
        let expired = store.expired(today());
        assert_eq!(expired.len(), 3);
        assert!(expired.iter().all(|l| l.maturity_date < today()));
    }

    #[test]
    fn by_user_matches_email_case_insensitively() {
        let store = LoanStore::new(seed_loans(today()));
        let loans = store.by_user(" Demo@TeamAchieve.com ");
        assert_eq!(loans.len(), 2);
        assert!(loans.iter().all(|l| l.user_email == "demo@teamachieve.com"));
    }

    #[test]
    fn delete_removes_once() {
        let store = LoanStore::new(seed_loans(today()));
        let id = store.all()[0].id.clone();

        assert_eq!(store.delete(&id).map(|l| l.id), Some(id.clone()));
        assert!(store.delete(&id).is_none());
        assert_eq!(store.all().len(), 6);
    }
}
