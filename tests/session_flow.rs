//! End-to-end session flow: hydrate, guard, sign in, tracked work, sign out.

use std::sync::{Arc, Mutex};

use storefront::{
    Location, MemoryProfileStorage, Navigator, Profile, SessionConfig, SessionContext, SessionError,
};
use tokio::sync::watch;

struct Router {
    location: watch::Sender<Location>,
    history: Arc<Mutex<Vec<String>>>,
}

impl Navigator for Router {
    fn replace(&self, path: &str) -> Result<(), SessionError> {
        self.history.lock().unwrap().push(path.to_owned());
        self.location.send_replace(Location::parse(path));
        Ok(())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::DEBUG).try_init();
}

async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn shopper_session_round_trip() {
    init_tracing();
    let ctx = SessionContext::new(SessionConfig::default(), Arc::new(MemoryProfileStorage::new()));

    let (loc_tx, loc_rx) = watch::channel(Location::parse("/(tabs)/home"));
    let history = Arc::new(Mutex::new(Vec::new()));
    let router = Router { location: loc_tx, history: history.clone() };
    let guard = tokio::spawn(ctx.guard().run(ctx.auth.subscribe(), loc_rx, router));

    settle().await;
    assert!(history.lock().unwrap().is_empty(), "guard idles until hydration");

    ctx.auth.hydrate();
    settle().await;
    assert_eq!(*history.lock().unwrap(), ["/(auth)/login"]);

    let login = ctx.loader().with_loading(async {
        Ok::<_, SessionError>(Profile {
            id: "c-204".to_owned(),
            name: "Lena".to_owned(),
            email: Some("lena@example.com".to_owned()),
            token: "session-token".to_owned(),
            expires_at: None,
        })
    });
    assert!(ctx.loader().is_loading());
    let profile = login.await.unwrap();
    assert!(!ctx.loader().is_loading());

    ctx.auth.login(profile).unwrap();
    settle().await;
    assert_eq!(*history.lock().unwrap(), ["/(auth)/login", "/(tabs)/home"]);

    let leaflets = ctx.queries.fetch("leaflets", async { vec!["weekly", "garden"] }).await;
    assert_eq!(leaflets.len(), 2);
    assert!(!ctx.queries.is_fetching());

    ctx.auth.logout().unwrap();
    settle().await;
    assert_eq!(history.lock().unwrap().last().map(String::as_str), Some("/(auth)/login"));

    guard.abort();
}
