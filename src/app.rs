use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::{Duration, Instant};

use crate::api::{ApiClient, CardApi, ContactApi, ProjectApi};
use crate::config::AppConfig;
use crate::pages::{ContactProfile, MyCardPage, ProjectsPage};
use crate::theme::{ThemePreference, ThemeStore};

/// How long a status message stays in the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Profile,  // Another user's card (only with --user)
    Projects,
    MyCard,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Profile => "Profile",
            Page::Projects => "Projects",
            Page::MyCard => "My card",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    ConfirmDelete,
}

pub struct App<A = ApiClient> {
    pub page: Page,
    pub popup: Popup,

    /// Theme handle; draw code reads the palette from here every frame
    pub theme: ThemeStore,
    pub config: AppConfig,
    api: A,

    pub profile: Option<ContactProfile>,
    pub projects: ProjectsPage,
    pub my_card: MyCardPage,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    /// Frame counter for the loader animation
    pub tick: usize,
}

impl App {
    pub fn new(config: AppConfig, theme: ThemeStore, target_user: Option<String>) -> Result<Self> {
        let api = ApiClient::from_config(&config)?;
        Ok(Self::with_api(config, theme, target_user, api))
    }
}

impl<A: ContactApi + CardApi + ProjectApi> App<A> {
    pub fn with_api(
        config: AppConfig,
        theme: ThemeStore,
        target_user: Option<String>,
        api: A,
    ) -> Self {
        let profile = match (&config.user_id, target_user) {
            (Some(me), Some(target)) => Some(ContactProfile::new(me.clone(), target)),
            (None, Some(target)) => {
                tracing::warn!("Cannot open profile {} without a user_id", target);
                None
            }
            _ => None,
        };
        let page = if profile.is_some() { Page::Profile } else { Page::Projects };

        Self {
            page,
            popup: Popup::None,
            theme,
            config,
            api,
            profile,
            projects: ProjectsPage::default(),
            my_card: MyCardPage::default(),
            status_message: None,
            status_message_time: None,
            tick: 0,
        }
    }

    /// Pages reachable with Tab, in order
    pub fn pages(&self) -> Vec<Page> {
        let mut pages = Vec::with_capacity(3);
        if self.profile.is_some() {
            pages.push(Page::Profile);
        }
        pages.push(Page::Projects);
        pages.push(Page::MyCard);
        pages
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Text-entry mode swallows every key except Esc
    pub fn is_editing(&self) -> bool {
        self.page == Page::MyCard && self.my_card.editing
    }

    /// Load every page from the backend
    pub async fn load(&mut self) {
        let Some(user_id) = self.config.user_id.clone() else {
            self.set_status("No user_id configured (set it in config.toml or pass --user-id)");
            return;
        };

        if let Some(profile) = self.profile.as_mut() {
            profile.load(&self.api).await;
        }
        self.projects.load(&self.api, &user_id).await;
        self.my_card.load(&self.api, &user_id).await;

        if let Some(err) = self.current_error() {
            self.set_status(err);
        }
    }

    async fn reload_page(&mut self) {
        let Some(user_id) = self.config.user_id.clone() else {
            return;
        };

        match self.page {
            Page::Profile => {
                if let Some(profile) = self.profile.as_mut() {
                    profile.load(&self.api).await;
                }
            }
            Page::Projects => self.projects.load(&self.api, &user_id).await,
            Page::MyCard => self.my_card.load(&self.api, &user_id).await,
        }

        match self.current_error() {
            Some(err) => self.set_status(err),
            None => self.set_status(format!("{} reloaded", self.page.title())),
        }
    }

    fn current_error(&self) -> Option<String> {
        match self.page {
            Page::Profile => self.profile.as_ref().and_then(|p| p.last_error.clone()),
            Page::Projects => self.projects.last_error.clone(),
            Page::MyCard => self.my_card.last_error.clone(),
        }
    }

    fn set_theme(&mut self, pref: Option<ThemePreference>) {
        match pref {
            Some(pref) => self.theme.set(pref),
            None => self.theme.toggle(),
        }
        self.set_status(format!("Theme: {}", self.theme.get()));
    }

    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            return self.handle_popup_key(key).await;
        }

        if self.is_editing() {
            return self.handle_edit_key(key).await;
        }

        self.handle_normal_key(key).await
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Tab => self.cycle_page(true),
            KeyCode::BackTab => self.cycle_page(false),

            KeyCode::Char('t') => self.set_theme(None),
            KeyCode::Char('L') => self.set_theme(Some(ThemePreference::Light)),
            KeyCode::Char('D') => self.set_theme(Some(ThemePreference::Dark)),

            KeyCode::Char('r') => self.reload_page().await,
            KeyCode::Char('?') => self.popup = Popup::Help,

            _ => match self.page {
                Page::Profile => self.handle_profile_key(key).await,
                Page::Projects => self.handle_projects_key(key).await,
                Page::MyCard => self.handle_my_card_key(key).await,
            },
        }
        Ok(())
    }

    async fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.popup {
            Popup::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')) {
                    self.popup = Popup::None;
                }
            }
            Popup::ConfirmDelete => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.popup = Popup::None;
                    self.delete_contact().await;
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.popup = Popup::None;
                }
                _ => {}
            },
            Popup::None => {}
        }
        Ok(())
    }

    fn cycle_page(&mut self, forward: bool) {
        let pages = self.pages();
        let index = pages.iter().position(|p| *p == self.page).unwrap_or(0);
        let next = if forward {
            (index + 1) % pages.len()
        } else {
            index.checked_sub(1).unwrap_or(pages.len() - 1)
        };
        self.page = pages[next];
    }

    async fn handle_profile_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('s') => self.save_contact().await,
            KeyCode::Char('x') | KeyCode::Delete => {
                if self.profile.as_ref().map(|p| p.is_saved()).unwrap_or(false) {
                    self.popup = Popup::ConfirmDelete;
                }
            }
            _ => {}
        }
    }

    async fn save_contact(&mut self) {
        let Some(profile) = self.profile.as_mut() else {
            return;
        };

        let status = if profile.is_saved() {
            "Already in your contacts".to_string()
        } else if profile.save_contact(&self.api).await {
            let name = profile.card.as_ref().map(|c| c.name.as_str()).unwrap_or("user");
            format!("Saved {} to contacts", name)
        } else {
            profile.last_error.clone().unwrap_or_default()
        };
        self.set_status(status);
    }

    async fn delete_contact(&mut self) {
        let Some(profile) = self.profile.as_mut() else {
            return;
        };

        let status = if profile.delete_contact(&self.api).await {
            "Contact removed".to_string()
        } else {
            profile.last_error.clone().unwrap_or_default()
        };
        self.set_status(status);
    }

    async fn handle_projects_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.projects.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.projects.move_up(),
            KeyCode::Char('f') => {
                self.projects.cycle_filter();
                let label = self.projects.filter.map(|s| s.as_str()).unwrap_or("all");
                self.set_status(format!("Filter: {}", label));
            }
            KeyCode::Enter => {
                self.projects.open_selected(&self.api).await;
                if let Some(err) = self.projects.last_error.clone() {
                    self.set_status(err);
                }
            }
            _ => {}
        }
    }

    async fn handle_my_card_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.my_card.focus_next(),
            KeyCode::Char('k') | KeyCode::Up => self.my_card.focus_prev(),
            KeyCode::Char('e') | KeyCode::Enter => {
                if self.my_card.loaded {
                    self.my_card.editing = true;
                } else {
                    self.set_status("Card not loaded yet, press r to reload");
                }
            }
            KeyCode::Char('s') => self.save_my_card().await,
            _ => {}
        }
    }

    async fn handle_edit_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => self.my_card.editing = false,
            KeyCode::Tab | KeyCode::Down => self.my_card.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.my_card.focus_prev(),
            KeyCode::Backspace => {
                self.my_card.focused_field().pop();
            }
            KeyCode::Enter => self.save_my_card().await,
            KeyCode::Char(c) => {
                if !self.my_card.focused_field().push(c) {
                    self.set_status("Field is full");
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn save_my_card(&mut self) {
        let status = if self.my_card.save(&self.api).await {
            "Card saved".to_string()
        } else {
            self.my_card.last_error.clone().unwrap_or_default()
        };
        self.set_status(status);
    }

    /// Per-frame housekeeping
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if let Some(time) = self.status_message_time {
            if time.elapsed() >= STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }
}
