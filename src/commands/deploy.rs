// ABOUTME: Deploy command implementation shared by push, start, stop, and delete.
// ABOUTME: Resolves config, runs project hooks, and drives the chosen strategy through the deployer.

use std::env;
use std::sync::Arc;

use cfdeploy::config::Config;
use cfdeploy::courier::{CfCliFactory, CourierFactory};
use cfdeploy::deploy::Deployer;
use cfdeploy::error::{Error, Result};
use cfdeploy::hooks::{HookContext, HookPoint, HookRunner};
use cfdeploy::output::Output;
use cfdeploy::strategy::{
    DeleteCreator, DeploymentInfo, PushCreator, PushOptions, StartCreator, StopCreator, Strategy,
};
use cfdeploy::types::{AppName, Operation};

use crate::cli::TargetArgs;

/// One operation requested on the command line.
pub enum DeployRequest {
    Push {
        target: TargetArgs,
        options: PushOptions,
    },
    Start(TargetArgs),
    Stop(TargetArgs),
    Delete(TargetArgs),
}

impl DeployRequest {
    fn target(&self) -> &TargetArgs {
        match self {
            DeployRequest::Push { target, .. }
            | DeployRequest::Start(target)
            | DeployRequest::Stop(target)
            | DeployRequest::Delete(target) => target,
        }
    }

    fn operation(&self) -> Operation {
        match self {
            DeployRequest::Push { .. } => Operation::Push,
            DeployRequest::Start(_) => Operation::Start,
            DeployRequest::Stop(_) => Operation::Stop,
            DeployRequest::Delete(_) => Operation::Delete,
        }
    }
}

/// Run an operation against every foundation of the requested environment.
pub async fn deploy(config: Config, request: DeployRequest, mut output: Output) -> Result<()> {
    let target = request.target().clone();
    let operation = request.operation();
    let environment = config.environment(&target.environment)?.clone();

    let info = DeploymentInfo {
        app: AppName::new(&target.app).map_err(|e| Error::InvalidArgument(e.to_string()))?,
        org: target.org.clone(),
        space: target.space.clone(),
        credentials: config.credentials.resolve()?,
    };

    output.start_timer();
    output.progress(&format!(
        "Running {} of {} on {} ({} foundation(s))",
        operation,
        info.app,
        environment.name,
        environment.foundations.len()
    ));

    let cwd = env::current_dir()?;
    let hook_runner = HookRunner::new(&cwd);
    let hook_context = HookContext::new(operation, &info, &environment);

    if let Some(result) = hook_runner.run(HookPoint::PreDeploy, &hook_context).await
        && !result.success
    {
        if !result.stderr.is_empty() {
            eprintln!("{}", result.stderr);
        }
        return Err(Error::Hook("pre-deploy hook failed".to_string()));
    }

    let factory: Arc<dyn CourierFactory> = Arc::new(CfCliFactory::from_config(&config.cf));
    let strategy = match request {
        DeployRequest::Push { options, .. } => {
            Strategy::Push(PushCreator::new(factory, info, options))
        }
        DeployRequest::Start(_) => Strategy::Start(StartCreator::new(factory, info)),
        DeployRequest::Stop(_) => Strategy::Stop(StopCreator::new(factory, info)),
        DeployRequest::Delete(_) => Strategy::Delete(DeleteCreator::new(factory, info)),
    };

    let mut response = Vec::new();
    let result = strategy
        .deploy(&Deployer::default(), &environment, &mut response)
        .await;
    output.platform_output(&response);

    match result {
        Ok(()) => {
            if let Some(result) = hook_runner.run(HookPoint::PostDeploy, &hook_context).await
                && !result.success
            {
                output.warning("post-deploy hook failed");
            }
            output.success(&format!("{} of {} complete", operation, hook_context.app));
            Ok(())
        }
        Err(e) => {
            let error_context = hook_context.with_error(&e);
            if let Some(result) = hook_runner.run(HookPoint::OnError, &error_context).await
                && !result.success
            {
                output.warning("on-error hook failed");
            }
            output.deploy_error(&e);
            Err(e.into())
        }
    }
}
