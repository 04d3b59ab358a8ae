// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-event pipeline.
//!
//! Order is fixed: dedup gate, command handling, classifier short-circuit,
//! store append, router, assistant append on success only. Every failure
//! past the dedup gate still produces a reply; one bad event must never
//! take the process down, so errors are logged here and mapped to a
//! user-facing message.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use courier_browser::SessionManager;
use courier_config::{AgentConfig, SessionConfig};
use courier_core::error::RouterError;
use courier_core::traits::SearchBackend;
use courier_core::types::{ConversationTurn, InboundEvent, OutboundReply};
use courier_router::{BackendRouter, ToolIntent, classify};
use courier_session::{ConversationStore, Deduplicator};
use tracing::{debug, error, info, warn};

use crate::commands::{self, Command};
use crate::tools;

const GENERIC_ERROR: &str =
    "Lo siento, ha ocurrido un error procesando tu mensaje. Inténtalo de nuevo en un momento.";

const NO_BACKEND: &str =
    "No tengo ningún modelo de lenguaje configurado ahora mismo. Revisa las claves de API.";

const NO_SEARCH: &str =
    "La búsqueda no está configurada, así que no puedo consultar precios. 🔧";

const NEWS_FAILED: &str =
    "No he podido conseguir el titular ahora mismo. Inténtalo más tarde. 📰";

/// Timeout for the plain-HTTP headline fallback.
const HTTP_FALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Orchestrates the full inbound pipeline for one event at a time.
pub struct Dispatcher {
    dedup: Deduplicator,
    store: ConversationStore,
    router: BackendRouter,
    search: Arc<dyn SearchBackend>,
    sessions: Arc<SessionManager>,
    agent_name: String,
    system_prompt: String,
    context_window: usize,
    front_page_url: String,
    started_at: DateTime<Utc>,
}

impl Dispatcher {
    pub fn new(
        router: BackendRouter,
        search: Arc<dyn SearchBackend>,
        sessions: Arc<SessionManager>,
        agent: &AgentConfig,
        session: &SessionConfig,
    ) -> Self {
        Self {
            dedup: Deduplicator::new(session.dedup_window),
            store: ConversationStore::new(session.max_turns),
            router,
            search,
            sessions,
            agent_name: agent.name.clone(),
            system_prompt: agent.system_prompt.clone(),
            context_window: session.context_window,
            front_page_url: tools::FRONT_PAGE_URL.to_string(),
            started_at: Utc::now(),
        }
    }

    /// Overrides the headline scrape target.
    pub fn with_front_page_url(mut self, url: impl Into<String>) -> Self {
        self.front_page_url = url.into();
        self
    }

    /// The dedup gate. Returns whether this update id should be processed.
    ///
    /// Must be consulted before any other side effect (including the typing
    /// indicator): a rejected duplicate has no observable effects at all.
    pub fn accept(&self, update_id: i64) -> bool {
        self.dedup.accept(update_id)
    }

    /// Runs the full pipeline: `None` only for duplicate deliveries.
    pub async fn handle(&self, event: &InboundEvent) -> Option<OutboundReply> {
        if !self.accept(event.id) {
            return None;
        }
        Some(self.process(event).await)
    }

    /// Pipeline past the dedup gate. Always produces a reply.
    pub async fn process(&self, event: &InboundEvent) -> OutboundReply {
        debug!(
            update_id = event.id,
            user_id = event.user_id,
            "processing event"
        );

        if let Some(cmd) = commands::parse(&event.text) {
            return self.handle_command(cmd, event).await;
        }

        if let Some(intent) = classify(&event.text) {
            info!(%intent, user_id = event.user_id, "tool intent matched");
            return match intent {
                ToolIntent::DateQuery => OutboundReply::plain(event.chat_id, tools::date_reply()),
                ToolIntent::HeadlineQuery => self.news_reply(event).await,
                ToolIntent::PriceQuery => self.price_reply(event).await,
            };
        }

        self.conversation_reply(event).await
    }

    /// Number of users with stored conversation state.
    pub fn user_count(&self) -> usize {
        self.store.user_count()
    }

    async fn conversation_reply(&self, event: &InboundEvent) -> OutboundReply {
        self.store
            .append(event.user_id, ConversationTurn::user(&event.text));
        let window = self.store.context_window(event.user_id, self.context_window);

        match self.router.respond(&window, Some(&self.system_prompt)).await {
            Ok(text) => {
                self.store
                    .append(event.user_id, ConversationTurn::assistant(&text));
                OutboundReply::plain(event.chat_id, text)
            }
            Err(RouterError::NoBackendAvailable) => {
                warn!(user_id = event.user_id, "no completion backend configured");
                OutboundReply::plain(event.chat_id, NO_BACKEND)
            }
            Err(err) => {
                error!(user_id = event.user_id, error = %err, "completion failed");
                OutboundReply::plain(event.chat_id, GENERIC_ERROR)
            }
        }
    }

    async fn price_reply(&self, event: &InboundEvent) -> OutboundReply {
        if !self.search.is_available() {
            return OutboundReply::plain(event.chat_id, NO_SEARCH);
        }
        match tools::bitcoin_price(self.search.as_ref()).await {
            Ok(text) => OutboundReply::plain(event.chat_id, text),
            Err(err) => {
                error!(error = %err, "price lookup failed");
                OutboundReply::plain(event.chat_id, GENERIC_ERROR)
            }
        }
    }

    async fn news_reply(&self, event: &InboundEvent) -> OutboundReply {
        match tools::front_page_headline(
            &self.sessions,
            event.user_id,
            &self.front_page_url,
            HTTP_FALLBACK_TIMEOUT,
        )
        .await
        {
            Ok(reply) => {
                // Keep the rendered page around so follow-up questions about
                // the front page reach the completion backends with context.
                if let Some(text) = reply.page_text {
                    self.store.append(
                        event.user_id,
                        ConversationTurn::system(format!(
                            "Contenido de la portada de El País:\n{text}"
                        )),
                    );
                }
                OutboundReply::rich(event.chat_id, reply.html)
            }
            Err(err) => {
                error!(error = %err, "headline scrape failed");
                OutboundReply::plain(event.chat_id, NEWS_FAILED)
            }
        }
    }

    async fn handle_command(&self, cmd: Command, event: &InboundEvent) -> OutboundReply {
        info!(command = ?cmd, user_id = event.user_id, "command received");
        match cmd {
            Command::Start => {
                self.store.clear(event.user_id);
                OutboundReply::plain(
                    event.chat_id,
                    format!(
                        "¡Hola! Soy {}. Puedo charlar contigo, decirte la fecha, \
                         buscar el precio de Bitcoin y traerte el titular de El País. \
                         Escríbeme lo que quieras o usa /help para ver los comandos.",
                        self.agent_name
                    ),
                )
            }
            Command::Help => OutboundReply::plain(event.chat_id, self.help_text()),
            Command::Clear => {
                self.store.clear(event.user_id);
                OutboundReply::plain(
                    event.chat_id,
                    "He borrado nuestra conversación. Empezamos de cero. ✨",
                )
            }
            Command::Status => OutboundReply::plain(event.chat_id, self.status_text()),
            Command::Bitcoin => self.price_reply(event).await,
            Command::News => self.news_reply(event).await,
        }
    }

    fn help_text(&self) -> String {
        let mut lines = vec![
            format!("Comandos de {}:", self.agent_name),
            "/start — saludo y reinicio de la conversación".to_string(),
            "/help — esta ayuda".to_string(),
            "/clear — borrar el historial".to_string(),
            "/status — estado del bot".to_string(),
            "/bitcoin — precio actual de Bitcoin".to_string(),
            "/news — titular de portada de El País".to_string(),
        ];
        if self.router.available_backend_names().is_empty() {
            lines.push(String::new());
            lines.push("⚠️ Sin modelo de lenguaje configurado: solo comandos.".to_string());
        }
        if !self.search.is_available() {
            lines.push(String::new());
            lines.push("⚠️ Búsqueda no configurada: /bitcoin no está disponible.".to_string());
        }
        lines.join("\n")
    }

    fn status_text(&self) -> String {
        let uptime_mins = (Utc::now() - self.started_at).num_minutes();
        let backends = self.router.available_backend_names();
        let backends = if backends.is_empty() {
            "ninguno".to_string()
        } else {
            backends.join(", ")
        };
        format!(
            "Bot: {}\nVersión: {}\nEn marcha desde hace {} min\nModelos: {}\nConversaciones: {}",
            self.agent_name,
            env!("CARGO_PKG_VERSION"),
            uptime_mins,
            backends,
            self.store.user_count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::error::BackendError;
    use courier_test_utils::{MockBrowser, MockCompletion, MockSearch};

    struct Fixture {
        dispatcher: Dispatcher,
        backend: Arc<MockCompletion>,
        search: Arc<MockSearch>,
        browser: Arc<MockBrowser>,
    }

    fn fixture() -> Fixture {
        let backend = Arc::new(MockCompletion::new("mock", 1));
        let search = Arc::new(MockSearch::new());
        let browser = MockBrowser::new();
        let router = BackendRouter::new(
            vec![backend.clone() as Arc<dyn courier_core::traits::CompletionBackend>],
            3,
            Duration::from_millis(1),
        );
        let sessions = Arc::new(SessionManager::new(
            browser.clone(),
            Duration::from_secs(30),
        ));
        let dispatcher = Dispatcher::new(
            router,
            search.clone(),
            sessions,
            &AgentConfig::default(),
            &SessionConfig::default(),
        );
        Fixture {
            dispatcher,
            backend,
            search,
            browser,
        }
    }

    fn event(id: i64, user_id: i64, text: &str) -> InboundEvent {
        InboundEvent {
            id,
            user_id,
            chat_id: user_id,
            text: text.to_string(),
            received_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_update_is_processed_once() {
        let fx = fixture();
        fx.backend.push_reply("primera respuesta");

        let first = fx.dispatcher.handle(&event(1, 10, "hola")).await;
        assert!(first.is_some());
        assert_eq!(fx.backend.calls(), 1);

        let second = fx.dispatcher.handle(&event(1, 10, "hola")).await;
        assert!(second.is_none(), "duplicate id yields no reply");
        assert_eq!(fx.backend.calls(), 1, "backend not called again");
        assert_eq!(fx.backend.last_turns().len(), 1, "no second user turn stored");
    }

    #[tokio::test]
    async fn conversation_appends_user_and_assistant() {
        let fx = fixture();
        fx.backend.push_reply("¡buenas!");

        let reply = fx.dispatcher.handle(&event(1, 10, "hola")).await.unwrap();
        assert_eq!(reply.text, "¡buenas!");
        assert!(!reply.rich_format);
        assert_eq!(reply.chat_id, 10);

        // The next turn sees both sides of the first exchange.
        fx.backend.push_reply("sigo aquí");
        fx.dispatcher.handle(&event(2, 10, "¿sigues ahí?")).await;
        let turns = fx.backend.last_turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].content, "hola");
        assert_eq!(turns[1].content, "¡buenas!");
        assert_eq!(turns[2].content, "¿sigues ahí?");
    }

    #[tokio::test]
    async fn failed_completion_keeps_user_turn_drops_assistant() {
        let fx = fixture();
        for _ in 0..3 {
            fx.backend.push_error(BackendError::Unknown("boom".into()));
        }

        let reply = fx.dispatcher.handle(&event(1, 10, "hola")).await.unwrap();
        assert_eq!(reply.text, GENERIC_ERROR);

        // Next call: only the user turns are in the window.
        fx.backend.push_reply("ok");
        fx.dispatcher.handle(&event(2, 10, "¿y ahora?")).await;
        let turns = fx.backend.last_turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "hola");
        assert_eq!(turns[1].content, "¿y ahora?");
    }

    #[tokio::test]
    async fn unavailable_backend_gets_specific_message() {
        let fx = fixture();
        fx.backend.set_available(false);

        let reply = fx.dispatcher.handle(&event(1, 10, "hola")).await.unwrap();
        assert_eq!(reply.text, NO_BACKEND);
        assert_eq!(fx.backend.calls(), 0);
    }

    #[tokio::test]
    async fn context_window_is_bounded() {
        let fx = fixture();
        // 12 exchanges stored; default context window is 10 turns.
        for i in 0..12 {
            fx.backend.push_reply(format!("r{i}"));
            fx.dispatcher
                .handle(&event(i, 10, &format!("m{i}")))
                .await;
        }
        assert_eq!(fx.backend.last_turns().len(), 10);
    }

    #[tokio::test]
    async fn date_intent_short_circuits_the_store() {
        let fx = fixture();
        let reply = fx
            .dispatcher
            .handle(&event(1, 10, "¿qué día es hoy?"))
            .await
            .unwrap();
        assert!(reply.text.starts_with("Hoy es "));
        assert_eq!(fx.backend.calls(), 0);

        // Store untouched by the tool path.
        fx.backend.push_reply("ok");
        fx.dispatcher.handle(&event(2, 10, "hola")).await;
        assert_eq!(fx.backend.last_turns().len(), 1);
    }

    #[tokio::test]
    async fn price_intent_uses_search() {
        let fx = fixture();
        let reply = fx
            .dispatcher
            .handle(&event(1, 10, "precio de bitcoin?"))
            .await
            .unwrap();
        // Empty mock results: polite fallback text, not an error.
        assert!(reply.text.contains("No he podido encontrar"));
        assert_eq!(
            fx.search.last_query().as_deref(),
            Some("precio Bitcoin hoy USD")
        );
    }

    #[tokio::test]
    async fn price_without_search_key_explains_itself() {
        let fx = fixture();
        fx.search.set_available(false);
        let reply = fx
            .dispatcher
            .handle(&event(1, 10, "/bitcoin"))
            .await
            .unwrap();
        assert_eq!(reply.text, NO_SEARCH);
    }

    #[tokio::test]
    async fn news_command_returns_rich_reply() {
        let fx = fixture();
        fx.browser
            .set_page_html("<h1>Un titular de portada suficientemente largo</h1>");
        let reply = fx.dispatcher.handle(&event(1, 10, "/news")).await.unwrap();
        assert!(reply.rich_format);
        assert!(reply.text.contains("Un titular de portada"));
        assert_eq!(fx.browser.inits(), 1);
    }

    #[tokio::test]
    async fn news_page_text_becomes_conversation_context() {
        let fx = fixture();
        fx.browser
            .set_page_html("<h1>Un titular de portada suficientemente largo</h1>");
        fx.dispatcher.handle(&event(1, 10, "/news")).await.unwrap();

        // The follow-up question sees the page content in its window.
        fx.backend.push_reply("la portada habla de...");
        fx.dispatcher
            .handle(&event(2, 10, "¿de qué va la portada?"))
            .await
            .unwrap();
        let turns = fx.backend.last_turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, courier_core::types::Role::System);
        assert!(turns[0].content.contains("portada de El País"));
        assert!(turns[0].content.contains("mock page text"));
        assert_eq!(turns[1].content, "¿de qué va la portada?");
    }

    #[tokio::test]
    async fn headline_intent_reuses_browser_session() {
        let fx = fixture();
        fx.browser
            .set_page_html("<h1>Un titular de portada suficientemente largo</h1>");
        fx.dispatcher
            .handle(&event(1, 10, "dame el titular"))
            .await
            .unwrap();
        fx.dispatcher.handle(&event(2, 10, "/news")).await.unwrap();
        assert_eq!(fx.browser.inits(), 1, "session reused across requests");
    }

    #[tokio::test]
    async fn start_and_clear_reset_history() {
        let fx = fixture();
        fx.backend.push_reply("ok");
        fx.dispatcher.handle(&event(1, 10, "hola")).await;
        assert_eq!(fx.dispatcher.user_count(), 1);

        let reply = fx.dispatcher.handle(&event(2, 10, "/clear")).await.unwrap();
        assert!(reply.text.contains("borrado"));
        assert_eq!(fx.dispatcher.user_count(), 0);

        fx.backend.push_reply("ok");
        fx.dispatcher.handle(&event(3, 10, "hola")).await;
        fx.dispatcher.handle(&event(4, 10, "/start")).await.unwrap();
        assert_eq!(fx.dispatcher.user_count(), 0);
    }

    #[tokio::test]
    async fn status_reports_version_and_backends() {
        let fx = fixture();
        let reply = fx.dispatcher.handle(&event(1, 10, "/status")).await.unwrap();
        assert!(reply.text.contains(env!("CARGO_PKG_VERSION")));
        assert!(reply.text.contains("mock"));
    }

    #[tokio::test]
    async fn help_warns_when_nothing_is_configured() {
        let fx = fixture();
        fx.backend.set_available(false);
        fx.search.set_available(false);
        let reply = fx.dispatcher.handle(&event(1, 10, "/help")).await.unwrap();
        assert!(reply.text.contains("/bitcoin"));
        assert!(reply.text.contains("Sin modelo de lenguaje"));
        assert!(reply.text.contains("Búsqueda no configurada"));
    }
}
