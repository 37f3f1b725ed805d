//! In-process stand-in for the rewrite service.
//!
//! Serves `ChimpRewrite`, `CreateSpin` and `Statistics` with deterministic
//! fake behavior, checks credentials against a single account and keeps the
//! account's credit counters. Every received form is recorded so tests can
//! see exactly what went over the wire.

use std::{collections::HashMap, sync::Arc};

use axum::{extract::State, routing::post, Form, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const DEFAULT_EMAIL: &str = "test@example.com";
pub const DEFAULT_API_KEY: &str = "test-key";

const STANDARD_WORDS_PER_CREDIT: usize = 5000;
const ADVANCED_WORDS_PER_CREDIT: usize = 500;

/// Body of a `ChimpRewrite` / `CreateSpin` reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteReply {
    pub status: String,
    pub output: String,
}

impl RewriteReply {
    fn success(output: String) -> Self {
        Self {
            status: "success".to_string(),
            output,
        }
    }

    fn failure(reason: &str) -> Self {
        Self {
            status: "failure".to_string(),
            output: reason.to_string(),
        }
    }
}

/// Body of a `Statistics` reply. An error reply carries only `error`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remainingthismonth: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prolimit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proexpiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apilimit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apiexpiry: Option<String>,
    #[serde(default)]
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usedtoday: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usedthismonth: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usedever: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct Account {
    pub email: String,
    pub api_key: String,
    pub api_limit: i64,
    pub pro_limit: i64,
    pub api_expiry: String,
    pub pro_expiry: String,
    pub used_today: i64,
    pub used_this_month: i64,
    pub used_ever: i64,
}

impl Account {
    pub fn new(email: &str, api_key: &str) -> Self {
        Self {
            email: email.to_string(),
            api_key: api_key.to_string(),
            api_limit: 250,
            pro_limit: 1000,
            api_expiry: "2099-12-31".to_string(),
            pro_expiry: "2099-12-31".to_string(),
            used_today: 0,
            used_this_month: 0,
            used_ever: 0,
        }
    }

    pub fn remaining_this_month(&self) -> i64 {
        self.api_limit - self.used_this_month
    }

    fn charge(&mut self, credits: i64) {
        self.used_today += credits;
        self.used_this_month += credits;
        self.used_ever += credits;
    }
}

/// One request as the server saw it.
#[derive(Clone, Debug)]
pub struct ReceivedRequest {
    pub operation: &'static str,
    pub form: Vec<(String, String)>,
}

impl ReceivedRequest {
    pub fn get(&self, key: &str) -> Option<&str> {
        lookup(&self.form, key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.form.iter().map(|(k, _)| k.as_str()).collect()
    }
}

#[derive(Debug, Default)]
pub struct ServerState {
    pub accounts: HashMap<String, Account>,
    pub received: Vec<ReceivedRequest>,
}

pub type Db = Arc<RwLock<ServerState>>;

/// State holding the default test account.
pub fn default_state() -> Db {
    state_with_account(Account::new(DEFAULT_EMAIL, DEFAULT_API_KEY))
}

pub fn state_with_account(account: Account) -> Db {
    let mut state = ServerState::default();
    state.accounts.insert(account.email.clone(), account);
    Arc::new(RwLock::new(state))
}

pub fn app() -> Router {
    app_with_state(default_state())
}

pub fn app_with_state(db: Db) -> Router {
    Router::new()
        .route("/ChimpRewrite", post(chimp_rewrite))
        .route("/CreateSpin", post(create_spin))
        .route("/Statistics", post(statistics))
        .with_state(db)
}

pub async fn run_with_state(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(db)).await
}

type Params = Vec<(String, String)>;

fn lookup<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
    form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

fn flag(form: &[(String, String)], key: &str) -> bool {
    lookup(form, key) == Some("1")
}

/// Check `aid`, `email` and `apikey`, returning the account's email.
fn authenticate(state: &ServerState, form: &[(String, String)]) -> Result<String, &'static str> {
    if lookup(form, "aid").unwrap_or_default().is_empty() {
        return Err("No application ID specified");
    }
    let email = lookup(form, "email").unwrap_or_default();
    let api_key = lookup(form, "apikey").unwrap_or_default();
    match state.accounts.get(email) {
        Some(account) if account.api_key == api_key => Ok(account.email.clone()),
        _ => Err("Invalid email or API key"),
    }
}

async fn chimp_rewrite(State(db): State<Db>, Form(form): Form<Params>) -> Json<RewriteReply> {
    let mut state = db.write().await;
    state.received.push(ReceivedRequest {
        operation: "ChimpRewrite",
        form: form.clone(),
    });

    let email = match authenticate(&state, &form) {
        Ok(email) => email,
        Err(reason) => return Json(RewriteReply::failure(reason)),
    };
    let text = lookup(&form, "text").unwrap_or_default();
    if text.is_empty() {
        return Json(RewriteReply::failure("No text provided"));
    }

    let advanced = flag(&form, "sentencerewrite") || flag(&form, "grammarcheck");
    let per_credit = if advanced {
        ADVANCED_WORDS_PER_CREDIT
    } else {
        STANDARD_WORDS_PER_CREDIT
    };
    let credits = text.split_whitespace().count().div_ceil(per_credit) as i64;

    let Some(account) = state.accounts.get_mut(&email) else {
        return Json(RewriteReply::failure("Invalid email or API key"));
    };
    if account.remaining_this_month() < credits {
        return Json(RewriteReply::failure("Not enough API credits remaining this month"));
    }
    account.charge(credits);
    info!(%email, credits, advanced, "rewrite");

    let protected: Vec<String> = lookup(&form, "protectedterms")
        .map(|terms| terms.split(',').map(str::to_string).collect())
        .unwrap_or_default();
    let output = fake_spin(
        text,
        &protected,
        flag(&form, "rewrite"),
        flag(&form, "spinwithinspin"),
    );
    Json(RewriteReply::success(output))
}

async fn create_spin(State(db): State<Db>, Form(form): Form<Params>) -> Json<RewriteReply> {
    let mut state = db.write().await;
    state.received.push(ReceivedRequest {
        operation: "CreateSpin",
        form: form.clone(),
    });

    if let Err(reason) = authenticate(&state, &form) {
        return Json(RewriteReply::failure(reason));
    }
    let text = lookup(&form, "text").unwrap_or_default();
    if text.is_empty() {
        return Json(RewriteReply::failure("No text provided"));
    }
    debug!("create spin");

    let mut output = resolve_spintax(text, flag(&form, "dontincludeoriginal"));
    if flag(&form, "reorderparagraphs") {
        output = reverse_paragraphs(&output);
    }
    Json(RewriteReply::success(output))
}

async fn statistics(State(db): State<Db>, Form(form): Form<Params>) -> Json<StatsReply> {
    let mut state = db.write().await;
    state.received.push(ReceivedRequest {
        operation: "Statistics",
        form: form.clone(),
    });

    let account = match authenticate(&state, &form) {
        Ok(email) => state.accounts.get(&email),
        Err(reason) => {
            return Json(StatsReply {
                error: reason.to_string(),
                ..StatsReply::default()
            })
        }
    };
    let Some(account) = account else {
        return Json(StatsReply {
            error: "Invalid email or API key".to_string(),
            ..StatsReply::default()
        });
    };
    Json(StatsReply {
        remainingthismonth: Some(account.remaining_this_month()),
        prolimit: Some(account.pro_limit),
        proexpiry: Some(account.pro_expiry.clone()),
        apilimit: Some(account.api_limit),
        apiexpiry: Some(account.api_expiry.clone()),
        error: String::new(),
        usedtoday: Some(account.used_today),
        usedthismonth: Some(account.used_this_month),
        usedever: Some(account.used_ever),
    })
}

/// Turn every unprotected word into `{word|WORD}`, or into `WORD` alone when
/// `plain` is set. Content of existing spintax is copied unless
/// `spin_within` is set.
pub fn fake_spin(text: &str, protected: &[String], plain: bool, spin_within: bool) -> String {
    let protected_ranges: Vec<(usize, usize)> = protected
        .iter()
        .filter(|term| !term.is_empty())
        .flat_map(|term| text.match_indices(term.as_str()).map(|(i, m)| (i, i + m.len())))
        .collect();
    let is_protected = |pos: usize| protected_ranges.iter().any(|&(s, e)| pos >= s && pos < e);

    let mut out = String::with_capacity(text.len() * 2);
    let mut word_start: Option<usize> = None;
    let mut depth = 0usize;

    let flush = |out: &mut String, start: usize, end: usize, depth: usize| {
        let word = &text[start..end];
        if is_protected(start) || (depth > 0 && !spin_within) {
            out.push_str(word);
        } else if plain {
            out.push_str(&word.to_uppercase());
        } else {
            out.push('{');
            out.push_str(word);
            out.push('|');
            out.push_str(&word.to_uppercase());
            out.push('}');
        }
    };

    for (i, c) in text.char_indices() {
        if c.is_alphabetic() {
            word_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = word_start.take() {
            flush(&mut out, start, i, depth);
        }
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        out.push(c);
    }
    if let Some(start) = word_start {
        flush(&mut out, start, text.len(), depth);
    }
    out
}

/// Pick one alternative from every `{a|b|...}` group, innermost first. The
/// first alternative is chosen unless `skip_original` is set and a second one
/// exists. Unbalanced groups are copied back verbatim.
pub fn resolve_spintax(text: &str, skip_original: bool) -> String {
    let mut stack: Vec<Vec<String>> = vec![vec![String::new()]];

    fn current(stack: &mut [Vec<String>]) -> Option<&mut String> {
        stack.last_mut().and_then(|frame| frame.last_mut())
    }

    for c in text.chars() {
        match c {
            '{' => stack.push(vec![String::new()]),
            '|' if stack.len() > 1 => {
                if let Some(frame) = stack.last_mut() {
                    frame.push(String::new());
                }
            }
            '}' if stack.len() > 1 => {
                let options = stack.pop().unwrap_or_default();
                let pick = if skip_original && options.len() > 1 { 1 } else { 0 };
                let chosen = options.into_iter().nth(pick).unwrap_or_default();
                if let Some(buf) = current(&mut stack) {
                    buf.push_str(&chosen);
                }
            }
            _ => {
                if let Some(buf) = current(&mut stack) {
                    buf.push(c);
                }
            }
        }
    }

    while stack.len() > 1 {
        let options = stack.pop().unwrap_or_default();
        let raw = format!("{{{}", options.join("|"));
        if let Some(buf) = current(&mut stack) {
            buf.push_str(&raw);
        }
    }
    stack.pop().and_then(|mut frame| frame.pop()).unwrap_or_default()
}

fn reverse_paragraphs(text: &str) -> String {
    text.rsplit("\n\n").collect::<Vec<_>>().join("\n\n")
}
