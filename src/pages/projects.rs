use crate::api::ProjectApi;
use crate::model::{Project, ProjectDetail, ProjectStatus};

#[derive(Debug, Clone, Default)]
pub struct ProjectsPage {
    pub projects: Vec<Project>,
    /// `None` shows every status
    pub filter: Option<ProjectStatus>,
    /// Index into `visible()`
    pub selected: usize,
    pub detail: Option<ProjectDetail>,
    pub loaded: bool,
    pub last_error: Option<String>,
}

impl ProjectsPage {
    pub fn visible(&self) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| self.filter.map_or(true, |status| p.status == status))
            .collect()
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.visible().get(self.selected).copied()
    }

    /// all -> forming -> active -> paused -> completed -> archived -> all
    pub fn cycle_filter(&mut self) {
        self.filter = match self.filter {
            None => Some(ProjectStatus::ALL[0]),
            Some(current) => ProjectStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| ProjectStatus::ALL.get(i + 1))
                .copied(),
        };
        self.selected = 0;
        self.detail = None;
    }

    pub fn move_down(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn move_up(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    pub async fn load<A: ProjectApi>(&mut self, api: &A, user_id: &str) {
        match api.list_projects(user_id).await {
            Ok(projects) => {
                self.projects = projects;
                self.loaded = true;
                self.last_error = None;
                let len = self.visible().len();
                if self.selected >= len {
                    self.selected = len.saturating_sub(1);
                }
                // Drop a detail whose project is gone
                if let Some(detail) = &self.detail {
                    if !self.projects.iter().any(|p| p.id == detail.project.id) {
                        self.detail = None;
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to load projects: {}", e);
                self.last_error = Some(format!("Could not load projects: {}", e));
            }
        }
    }

    /// Fetch members for the selected project
    pub async fn open_selected<A: ProjectApi>(&mut self, api: &A) {
        let id = match self.selected_project() {
            Some(project) => project.id.clone(),
            None => return,
        };

        match api.get_project(&id).await {
            Ok(detail) => {
                self.detail = Some(detail);
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!("Failed to load project {}: {}", id, e);
                self.last_error = Some(format!("Could not load project: {}", e));
            }
        }
    }
}
