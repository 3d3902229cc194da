use std::sync::{Arc, Mutex};

use super::*;
use crate::auth::Profile;

fn routes() -> RouteGroups {
    RouteGroups { auth_group: "(auth)".to_owned(), login_path: "/login".to_owned(), home_path: "/home".to_owned() }
}

fn signed_out() -> AuthState {
    AuthState { profile: None, hydrated: true }
}

fn signed_in() -> AuthState {
    AuthState {
        profile: Some(Profile {
            id: "u1".to_owned(),
            name: "Ana".to_owned(),
            email: None,
            token: "t".to_owned(),
            expires_at: None,
        }),
        hydrated: true,
    }
}

#[derive(Default)]
struct RecordingNavigator {
    replaced: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn replaced(&self) -> Vec<String> {
        self.replaced.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, path: &str) -> Result<(), SessionError> {
        self.replaced.lock().unwrap().push(path.to_owned());
        Ok(())
    }
}

/// Router stand-in: a replace moves the published location.
struct SimulatedRouter {
    location: watch::Sender<Location>,
    replaced: Arc<Mutex<Vec<String>>>,
}

impl Navigator for SimulatedRouter {
    fn replace(&self, path: &str) -> Result<(), SessionError> {
        self.replaced.lock().unwrap().push(path.to_owned());
        self.location.send_replace(Location::parse(path));
        Ok(())
    }
}

struct FailingNavigator;

impl Navigator for FailingNavigator {
    fn replace(&self, path: &str) -> Result<(), SessionError> {
        Err(SessionError::Navigation { path: path.to_owned(), reason: "router not mounted".to_owned() })
    }
}

async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

// =============================================================
// Location
// =============================================================

#[test]
fn location_parse_drops_empty_segments_query_and_fragment() {
    let loc = Location::parse("/(auth)//login/?next=/cart#top");
    assert_eq!(loc.segments(), ["(auth)", "login"]);
    assert_eq!(loc.first(), Some("(auth)"));
    assert_eq!(loc.path(), "/(auth)/login");
}

#[test]
fn location_root_has_no_segments() {
    let loc = Location::parse("/");
    assert!(loc.segments().is_empty());
    assert_eq!(loc.first(), None);
    assert_eq!(loc.path(), "/");
    assert_eq!(loc, Location::default());
}

#[test]
fn auth_group_matches_group_segment_or_login_path() {
    let r = routes();
    assert!(in_auth_group(&Location::parse("/(auth)/register"), &r));
    assert!(in_auth_group(&Location::parse("/login"), &r));
    assert!(!in_auth_group(&Location::parse("/home"), &r));
    assert!(!in_auth_group(&Location::parse("/shops/(auth)"), &r));
}

// =============================================================
// evaluate
// =============================================================

#[test]
fn unauthenticated_on_protected_route_goes_to_login() {
    let loc = Location::parse("/home");
    assert_eq!(
        evaluate(AuthPhase::Unauthenticated, Some(&loc), true, &routes()),
        Some(RedirectTarget::Login)
    );
}

#[test]
fn authenticated_on_login_goes_home() {
    let loc = Location::parse("/login");
    assert_eq!(evaluate(AuthPhase::Authenticated, Some(&loc), true, &routes()), Some(RedirectTarget::Home));
}

#[test]
fn matching_state_and_location_is_a_noop() {
    let login = Location::parse("/login");
    let home = Location::parse("/home");
    assert_eq!(evaluate(AuthPhase::Unauthenticated, Some(&login), true, &routes()), None);
    assert_eq!(evaluate(AuthPhase::Authenticated, Some(&home), true, &routes()), None);
}

#[test]
fn nothing_happens_before_hydration() {
    let r = routes();
    for loc in ["/home", "/login", "/(auth)/register", "/"] {
        let loc = Location::parse(loc);
        assert_eq!(evaluate(AuthPhase::Unauthenticated, Some(&loc), false, &r), None);
        assert_eq!(evaluate(AuthPhase::Authenticated, Some(&loc), false, &r), None);
    }
    assert_eq!(evaluate(AuthPhase::Unauthenticated, None, false, &r), None);
}

#[test]
fn missing_location_is_treated_as_protected() {
    assert_eq!(evaluate(AuthPhase::Unauthenticated, None, true, &routes()), Some(RedirectTarget::Login));
    assert_eq!(evaluate(AuthPhase::Authenticated, None, true, &routes()), None);
}

#[test]
fn redirect_target_paths_come_from_routes() {
    let r = routes();
    assert_eq!(RedirectTarget::Login.path(&r), "/login");
    assert_eq!(RedirectTarget::Home.path(&r), "/home");
}

// =============================================================
// RouteGuard::on_change
// =============================================================

#[test]
fn guard_redirects_exactly_once_to_login() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(routes());
    let loc = Location::parse("/home");

    assert_eq!(guard.on_change(&signed_out(), Some(&loc), &nav), Some(RedirectTarget::Login));
    assert_eq!(nav.replaced(), ["/login"]);
}

#[test]
fn guard_redirects_exactly_once_to_home() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(routes());
    let loc = Location::parse("/login");

    assert_eq!(guard.on_change(&signed_in(), Some(&loc), &nav), Some(RedirectTarget::Home));
    assert_eq!(nav.replaced(), ["/home"]);
}

#[test]
fn guard_leaves_signed_out_user_on_login() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(routes());
    let loc = Location::parse("/login");

    assert_eq!(guard.on_change(&signed_out(), Some(&loc), &nav), None);
    assert!(nav.replaced().is_empty());
}

#[test]
fn guard_waits_for_hydration() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(routes());
    let unhydrated = AuthState { profile: None, hydrated: false };

    assert_eq!(guard.on_change(&unhydrated, Some(&Location::parse("/home")), &nav), None);
    assert_eq!(guard.on_change(&unhydrated, Some(&Location::parse("/login")), &nav), None);
    assert!(nav.replaced().is_empty());
}

#[test]
fn repeated_evaluation_with_same_inputs_redirects_once() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(routes());
    let loc = Location::parse("/home");

    guard.on_change(&signed_out(), Some(&loc), &nav);
    assert_eq!(guard.on_change(&signed_out(), Some(&loc), &nav), None);
    assert_eq!(nav.replaced().len(), 1);
}

#[test]
fn memo_resets_after_consistent_state() {
    let nav = RecordingNavigator::default();
    let mut guard = RouteGuard::new(routes());
    let home = Location::parse("/home");
    let login = Location::parse("/login");

    guard.on_change(&signed_out(), Some(&home), &nav);
    guard.on_change(&signed_out(), Some(&login), &nav);
    // User navigates back to a protected page later on.
    guard.on_change(&signed_out(), Some(&home), &nav);
    assert_eq!(nav.replaced(), ["/login", "/login"]);
}

#[test]
fn failed_redirect_is_not_retried() {
    let mut guard = RouteGuard::new(routes());
    let loc = Location::parse("/home");

    assert_eq!(guard.on_change(&signed_out(), Some(&loc), &FailingNavigator), Some(RedirectTarget::Login));
    assert_eq!(guard.on_change(&signed_out(), Some(&loc), &FailingNavigator), None);
}

// =============================================================
// RouteGuard::run
// =============================================================

#[tokio::test]
async fn run_follows_auth_changes_without_loops() {
    let (auth_tx, auth_rx) = watch::channel(AuthState::default());
    let (loc_tx, loc_rx) = watch::channel(Location::parse("/home"));
    let replaced = Arc::new(Mutex::new(Vec::new()));
    let router = SimulatedRouter { location: loc_tx, replaced: replaced.clone() };

    let handle = tokio::spawn(RouteGuard::new(routes()).run(auth_rx, loc_rx, router));
    settle().await;
    assert!(replaced.lock().unwrap().is_empty(), "no redirect before hydration");

    auth_tx.send_replace(signed_out());
    settle().await;
    assert_eq!(*replaced.lock().unwrap(), ["/login"]);

    auth_tx.send_replace(signed_in());
    settle().await;
    assert_eq!(*replaced.lock().unwrap(), ["/login", "/home"]);

    drop(auth_tx);
    handle.await.unwrap();
}

#[tokio::test]
async fn run_stops_when_location_source_closes() {
    let (_auth_tx, auth_rx) = watch::channel(signed_out());
    let (loc_tx, loc_rx) = watch::channel(Location::parse("/login"));
    let nav = RecordingNavigator::default();

    let handle = tokio::spawn(async move {
        RouteGuard::new(routes()).run(auth_rx, loc_rx, &nav).await;
        nav.replaced()
    });
    settle().await;
    drop(loc_tx);
    assert!(handle.await.unwrap().is_empty());
}
