use super::*;

impl App {
    pub(super) fn run_current_input(&mut self) {
        let line = self.input.buf.trim().to_string();
        self.input.push_history(&line);
        self.input.clear();
        self.suggestions.clear();
        self.suggestion_selected = 0;
        if line.is_empty() {
            return;
        }

        self.last_command = Some(line.clone());
        match parse_command(&line, self.tree.selected()) {
            Ok(cmd) => self.run_command(cmd),
            Err(msg) => self.report(Level::Warn, msg),
        }
    }

    pub(super) fn run_command(&mut self, cmd: Command) {
        match cmd {
            Command::Help => self.show_help(),
            Command::Refresh => self.refresh_all(),
            Command::New => self.spawn_job(Job::AddApplication),
            Command::Filter => self.spawn_job(Job::Filter),
            Command::ClearFilter => {
                let outcome = services::clear_filter(self.session());
                self.apply_outcome(outcome);
            }
            Command::Settings => self.show_settings(),
            Command::Set { key, value } => self.change_setting(key, &value),
            Command::Login { tenant } => {
                self.report(Level::Info, "Waiting for `az login` to finish");
                self.workers.sign_in(tenant);
            }
            Command::Logout => {
                self.workers.credentials.invalidate();
                self.session().set_authenticated(false);
                self.busy.clear();
                self.report(Level::Info, "Signed out");
                self.refresh_all();
            }
            Command::Quit => self.quit = true,
            Command::Edit(action) => match self.tree.selected().cloned() {
                Some(node) => self.spawn_job(Job::Edit { action, node }),
                None => self.report(Level::Warn, "Nothing is selected"),
            },
        }
    }

    fn spawn_job(&mut self, job: Job) {
        let tenant = self.tenant_for_links();
        self.workers.edit(job, self.settings.clone(), tenant);
    }

    /// Re-render whatever an applied edit touched.
    pub(super) fn apply_outcome(&mut self, outcome: EditOutcome) {
        match outcome {
            EditOutcome::Applied(Refresh::Full) => self.refresh_all(),
            EditOutcome::Applied(Refresh::Application { object_id }) => {
                self.workers.application(object_id)
            }
            EditOutcome::Applied(Refresh::Branch { object_id, kind }) => {
                let key = NodeKey::branch(&object_id, kind);
                match self.tree.find(&key).cloned() {
                    Some(group) => {
                        self.loading.insert(key);
                        self.workers.expand(group);
                    }
                    None => tracing::debug!(?key, "edited branch is no longer on screen"),
                }
            }
            EditOutcome::Applied(Refresh::Nothing) => {}
            EditOutcome::Cancelled => self.report(Level::Info, "Cancelled"),
            EditOutcome::Rejected(msg) => self.report(Level::Warn, msg),
        }
    }

    fn change_setting(&mut self, key: SettingKey, value: &str) {
        let mut next = self.settings.clone();
        if let Err(msg) = next.set(key, value) {
            self.report(Level::Warn, msg);
            return;
        }
        if let Err(err) = self.store.write(&next) {
            self.report_error(&err);
            return;
        }

        let repopulate = self.settings.repopulation_needed(&next);
        self.settings = next;
        if !self.settings.use_eventual_consistency && self.session().filter().is_some() {
            self.session().set_filter(None);
        }
        self.report(
            Level::Info,
            format!("{} = {}", key.name(), self.settings.get(key)),
        );
        if repopulate {
            self.refresh_all();
        }
    }

    fn show_settings(&mut self) {
        let mut lines: Vec<String> = SettingKey::ALL
            .into_iter()
            .map(|k| format!("{:<32} {}", k.name(), self.settings.get(k)))
            .collect();
        lines.push(String::new());
        lines.push(format!("file: {}", self.store.path().display()));
        lines.push("change with: set <key> <value>".to_string());
        self.pending.push_back(Modal::viewer("Settings", lines));
    }

    fn show_help(&mut self) {
        let mut lines = vec![
            "↑/↓ move   →/← expand/collapse   Enter default action".to_string(),
            "F5 refresh   Tab complete   Esc clear input   q quit".to_string(),
            String::new(),
        ];
        let describe = |d: &CommandDef| {
            let aliases = if d.aliases.is_empty() {
                String::new()
            } else {
                format!(" ({})", d.aliases.join(", "))
            };
            format!("  {:<22} {}{}", d.usage, d.help, aliases)
        };
        if let Some(node) = self.tree.selected() {
            lines.push(format!("On {}:", node.label));
            lines.extend(node_actions(node).iter().map(|(d, _)| describe(d)));
            lines.push(String::new());
        }
        lines.push("Anywhere:".to_string());
        lines.extend(global_command_defs().iter().map(describe));
        self.pending.push_back(Modal::viewer("Help", lines));
    }

    /// Enter on an empty prompt: sign in, or toggle the selected node.
    pub(super) fn run_default_action(&mut self) {
        let Some((sign_in, expanded)) = self
            .tree
            .selected()
            .map(|n| (n.kind == NodeKind::SignIn, n.expanded))
        else {
            return;
        };
        if sign_in {
            self.run_command(Command::Login { tenant: None });
        } else if expanded {
            self.collapse_selected();
        } else {
            self.expand_selected();
        }
    }

    pub(super) fn expand_selected(&mut self) {
        let Some(path) = self.tree.selected_path() else {
            return;
        };
        let Some(node) = self.tree.node(&path) else {
            return;
        };
        match &node.children {
            Children::Leaf => {}
            Children::Loaded(_) => {
                self.tree.open(&path);
            }
            Children::Lazy => {
                let key = NodeKey::of(node);
                if !self.loading.contains(&key) {
                    let node = node.clone();
                    self.loading.insert(key);
                    self.workers.expand(node);
                }
            }
        }
    }

    pub(super) fn collapse_selected(&mut self) {
        let Some(path) = self.tree.selected_path() else {
            return;
        };
        match self.tree.node(&path).map(|n| n.expanded) {
            Some(true) => self.tree.close(&path),
            Some(false) => self.tree.select_parent(),
            None => {}
        }
    }
}
