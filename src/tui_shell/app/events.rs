use super::*;

impl App {
    /// Apply everything the workers reported since the last frame.
    pub(super) fn drain_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event);
        }
        self.open_pending_modal();
    }

    pub(super) fn open_pending_modal(&mut self) {
        if self.modal.is_none() {
            self.modal = self.pending.pop_front();
        }
    }

    pub(super) fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Prompt(prompt) => self.pending.push_back(Modal::from_prompt(prompt)),
            UiEvent::Busy { key, label } => {
                self.busy.insert(key, label);
            }
            UiEvent::Restore { key } => {
                self.busy.remove(&key);
            }
            UiEvent::Copy { text, reply } => {
                let _ = reply.send(self.copy_to_clipboard(&text));
            }
            UiEvent::Notice { level, message } => self.report(level, message),
            UiEvent::Initialized { authenticated } => {
                tracing::debug!(authenticated, "session initialized");
                self.refresh_all();
            }
            UiEvent::SignedIn(result) => {
                self.needs_clear = true;
                match result {
                    Ok(()) => {
                        self.report(Level::Info, "Signed in");
                        self.reinitialized = false;
                        self.start();
                    }
                    Err(err) => self.report_error(&err.context("sign in")),
                }
            }
            UiEvent::Rendered(result) => self.rendered(result),
            UiEvent::Expanded { key, result } => {
                self.loading.remove(&key);
                match result {
                    Ok(children) => {
                        if !self.tree.set_children(&key, children) {
                            tracing::debug!(?key, "expanded node is gone");
                        }
                    }
                    Err(err) => self.background_failed(err),
                }
            }
            UiEvent::ApplicationLoaded { object_id, result } => match result {
                Ok(node) => self.tree.replace_application(&object_id, node),
                Err(err) => self.background_failed(err),
            },
            UiEvent::JobDone { target, result } => {
                if let Some(key) = &target {
                    self.busy.remove(key);
                }
                match result {
                    Ok(JobOutput::Outcome(outcome)) => self.apply_outcome(outcome),
                    Ok(JobOutput::Manifest { title, text }) => {
                        let lines = text.lines().map(str::to_string).collect();
                        self.pending.push_back(Modal::viewer(title, lines));
                    }
                    Err(err) => self.background_failed(err),
                }
            }
        }
    }

    fn rendered(&mut self, result: Result<Render>) {
        if !matches!(result, Ok(Render::Skipped)) {
            self.rendering = false;
        }
        match result {
            Ok(Render::Rendered { nodes, warning }) => {
                if self.session().is_authenticated() {
                    self.reinitialized = false;
                }
                self.tree.set_roots(nodes);
                self.loading.clear();
                if let Some(warning) = warning {
                    self.report(Level::Warn, warning);
                }
            }
            // Another pass is in flight and will deliver its own nodes.
            Ok(Render::Skipped) => {}
            Ok(Render::SignedOut) => self.signed_out(),
            Err(err) => self.report_error(&err),
        }
    }

    /// A credential went stale: retry the silent sign-in once, then show
    /// the sign-in node.
    pub(super) fn signed_out(&mut self) {
        self.session().set_authenticated(false);
        if self.reinitialized {
            self.refresh_all();
        } else {
            self.reinitialized = true;
            self.start();
        }
    }

    fn background_failed(&mut self, err: anyhow::Error) {
        if is_credential_error(&err) {
            tracing::info!(error = %format!("{:#}", err), "credential lost; re-initializing");
            self.signed_out();
        } else {
            self.report_error(&err);
        }
    }
}
