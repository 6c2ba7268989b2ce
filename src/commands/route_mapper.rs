//! map-route / unmap-route: bind or unbind a route to an application.
//!
//! Exactly two positional arguments (app name, domain) plus an optional
//! hostname flag; login, application, and route requirements in that
//! order; the run phase reuses both resolved resources.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Command, CommandArgs, CommandError, report_failed};
use crate::api::RouteRepository;
use crate::requirements::{
    ApplicationRequirement, Requirement, RequirementFactory, RouteRequirement,
};
use crate::session::Session;
use crate::terminal::Ui;

pub struct RouteMapper {
    ui: Arc<dyn Ui>,
    session: Arc<Session>,
    routes: Arc<dyn RouteRepository>,
    app_req: Option<Arc<ApplicationRequirement>>,
    route_req: Option<Arc<RouteRequirement>>,
    bind: bool,
}

impl RouteMapper {
    /// The map-route variant.
    pub fn map(ui: Arc<dyn Ui>, session: Arc<Session>, routes: Arc<dyn RouteRepository>) -> Self {
        Self::new(ui, session, routes, true)
    }

    /// The unmap-route variant.
    pub fn unmap(ui: Arc<dyn Ui>, session: Arc<Session>, routes: Arc<dyn RouteRepository>) -> Self {
        Self::new(ui, session, routes, false)
    }

    fn new(
        ui: Arc<dyn Ui>,
        session: Arc<Session>,
        routes: Arc<dyn RouteRepository>,
        bind: bool,
    ) -> Self {
        Self {
            ui,
            session,
            routes,
            app_req: None,
            route_req: None,
            bind,
        }
    }

    fn usage(&self) -> String {
        if self.bind {
            "map-route APP_NAME DOMAIN [-n HOSTNAME]".to_string()
        } else {
            "unmap-route APP_NAME DOMAIN [-n HOSTNAME]".to_string()
        }
    }
}

#[async_trait]
impl Command for RouteMapper {
    fn get_requirements(
        &mut self,
        factory: &dyn RequirementFactory,
        args: &CommandArgs,
    ) -> Result<Vec<Arc<dyn Requirement>>, CommandError> {
        let [app_name, domain] = args.positional() else {
            return Err(CommandError::Usage(self.usage()));
        };
        let host = args.flag("hostname").unwrap_or_default();

        let app_req = factory.application(app_name);
        let route_req = factory.route(host, domain);
        self.app_req = Some(Arc::clone(&app_req));
        self.route_req = Some(Arc::clone(&route_req));

        let requirements: Vec<Arc<dyn Requirement>> =
            vec![factory.login(), app_req, route_req];
        Ok(requirements)
    }

    async fn run(&mut self, _args: &CommandArgs) -> Result<(), CommandError> {
        // Resources were resolved during the requirements phase.
        let app = self
            .app_req
            .as_ref()
            .expect("route mapper run before requirements")
            .application();
        let route = self
            .route_req
            .as_ref()
            .expect("route mapper run before requirements")
            .route();

        let identity = self
            .session
            .identity()
            .map_err(|e| report_failed(self.ui.as_ref(), e.to_string()))?;

        if self.bind {
            self.ui.say(&format!(
                "Adding route {} to app {} in org {} / space {} as {}...",
                route.url(),
                app.name,
                identity.organization,
                identity.space,
                identity.username,
            ));
        } else {
            self.ui.say(&format!(
                "Removing route {} from app {} in org {} / space {} as {}...",
                route.url(),
                app.name,
                identity.organization,
                identity.space,
                identity.username,
            ));
        }

        let reply = if self.bind {
            self.routes.bind(&route, &app).await
        } else {
            self.routes.unbind(&route, &app).await
        };

        let (_, warnings, error) = reply.into_parts();
        self.ui.warn_all(&warnings);

        if let Some(error) = error {
            return Err(report_failed(self.ui.as_ref(), error.to_string()));
        }

        self.ui.ok();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::fakes::FakeFactory;

    #[test]
    fn usage_rejects_wrong_arity_before_any_requirement() {
        let factory = FakeFactory::logged_in();
        let session = Arc::new(Session::open(":memory:").unwrap());
        let mut cmd = RouteMapper::map(
            factory.ui.clone(),
            session,
            factory.routes.clone(),
        );

        let err = cmd
            .get_requirements(&factory, &CommandArgs::new(vec!["only-one".to_string()]))
            .unwrap_err();

        assert!(matches!(err, CommandError::Usage(_)));
        assert!(factory.requested().is_empty());
        assert_eq!(factory.apps.find_by_name.call_count(), 0);
    }

    #[test]
    fn declares_login_then_app_then_route() {
        let factory = FakeFactory::logged_in();
        let session = Arc::new(Session::open(":memory:").unwrap());
        let mut cmd = RouteMapper::map(
            factory.ui.clone(),
            session,
            factory.routes.clone(),
        );

        let args = CommandArgs::new(vec!["my-app".to_string(), "example.com".to_string()])
            .with_flag("hostname", "my-host");
        let requirements = cmd.get_requirements(&factory, &args).unwrap();

        assert_eq!(requirements.len(), 3);
        assert_eq!(
            factory.requested(),
            ["application my-app", "route my-host.example.com"]
        );
    }
}
