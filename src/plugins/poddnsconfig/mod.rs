// Copyright 2024 The Kubernetes Authors.
// Licensed under the Apache License, Version 2.0

//! PodDnsConfig admission controller.
//!
//! This admission controller injects an operator-supplied cluster DNS
//! configuration into the `dnsConfig` of pods whose `dnsPolicy` is
//! `ClusterFirst`. Injected nameservers are placed ahead of any the pod
//! already lists so the cluster resolver is queried first; injected search
//! domains are placed after the pod's own so more specific suffixes are
//! tried first; injected options never override an option the pod author
//! already set.

use crate::admission::{
    AdmissionError, AdmissionResult, Attributes, Handler, Interface, MutationInterface, Operation,
    Plugins,
};
use crate::api::core::{DnsPolicy, Pod, PodDnsConfig, PodDnsConfigOption};
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use thiserror::Error;

/// Plugin name for the PodDnsConfig admission controller.
pub const PLUGIN_NAME: &str = "PodDnsConfig";

/// Register the PodDnsConfig plugin with the plugin registry.
///
/// The configuration reader, when present, carries the YAML policy file.
/// A missing reader yields an empty policy (the plugin then injects
/// nothing); a malformed one fails registration, which aborts startup.
pub fn register(plugins: &Plugins) {
    plugins.register(PLUGIN_NAME, |config: Option<&mut dyn Read>| {
        let plugin = match config {
            Some(reader) => Plugin::from_reader(reader)
                .map_err(|e| AdmissionError::config_error(e.to_string()))?,
            None => Plugin::new(),
        };
        Ok(Arc::new(plugin) as Arc<dyn Interface>)
    });
}

/// ConfigError indicates the operator policy file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration could not be read.
    #[error("reading DNS injection config: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration is not valid YAML of the expected shape.
    #[error("parsing DNS injection config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// DnsOption is a single named resolver option in the operator policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsOption {
    pub name: String,
    pub value: String,
}

/// DnsConfig is the operator-supplied DNS policy: the nameservers, search
/// domains and resolver options to inject. All three lists are ordered;
/// declaration order determines injection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DnsConfig {
    #[serde(default)]
    pub nameservers: Vec<String>,
    #[serde(default)]
    pub searches: Vec<String>,
    #[serde(default)]
    pub options: Vec<DnsOption>,
}

/// On-disk shape of the policy file: the DnsConfig nested under a
/// `dnsConfig` key, mirroring the pod field it feeds.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default, rename = "dnsConfig")]
    dns_config: DnsConfig,
}

/// Plugin injects cluster DNS configuration into pods.
///
/// The two derived structures are built once at construction and never
/// mutated afterwards, so a single instance is safe to share across
/// concurrent admission calls without locking.
pub struct Plugin {
    handler: Handler,
    config: DnsConfig,
    /// Option name to value, for O(1) presence checks during the merge.
    /// Last write wins if the policy repeats a name.
    options_by_name: HashMap<String, String>,
    /// Policy options materialized in the pod's option shape, in
    /// declaration order.
    pod_options: Vec<PodDnsConfigOption>,
}

impl Plugin {
    /// Create a new PodDnsConfig admission controller with an empty policy.
    pub fn new() -> Self {
        Self::with_config(DnsConfig::default())
    }

    /// Create a new PodDnsConfig admission controller with the given policy.
    pub fn with_config(config: DnsConfig) -> Self {
        let mut options_by_name = HashMap::with_capacity(config.options.len());
        let mut pod_options = Vec::with_capacity(config.options.len());
        for opt in &config.options {
            pod_options.push(PodDnsConfigOption::new(&opt.name, &opt.value));
            options_by_name.insert(opt.name.clone(), opt.value.clone());
        }
        Self {
            handler: Handler::new(&[Operation::Create]),
            config,
            options_by_name,
            pod_options,
        }
    }

    /// Load the policy from a YAML configuration reader.
    pub fn from_reader(reader: &mut dyn Read) -> Result<Self, ConfigError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        let file: ConfigFile = serde_yaml::from_str(&contents)?;
        Ok(Self::with_config(file.dns_config))
    }

    /// Look up the policy value for a resolver option name.
    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.options_by_name.get(name).map(String::as_str)
    }

    /// Returns true if the pod is eligible for injection. Only pods that
    /// will actually use the cluster resolver are touched; pods opting out
    /// of cluster DNS (host network, None, Default) are left alone.
    fn should_inject(pod: &Pod) -> bool {
        pod.spec.dns_policy == DnsPolicy::ClusterFirst
    }

    /// Write the merged DNS configuration onto the pod in place.
    fn inject_dns_config(&self, pod: &mut Pod) {
        let dns_config = match pod.spec.dns_config.as_mut() {
            // No existing dnsConfig block: construct it from the policy
            // verbatim, no merge logic.
            None => {
                pod.spec.dns_config = Some(PodDnsConfig {
                    nameservers: self.config.nameservers.clone(),
                    searches: self.config.searches.clone(),
                    options: self.pod_options.clone(),
                });
                return;
            }
            Some(c) => c,
        };

        self.merge_nameservers(dns_config);
        self.merge_searches(dns_config);
        self.merge_options(dns_config);
    }

    /// Merge nameservers: policy entries first, in policy order, so the
    /// cluster resolver takes precedence; then the pod's own entries in
    /// their original order, minus exact duplicates of policy entries.
    fn merge_nameservers(&self, dns_config: &mut PodDnsConfig) {
        let mut merged = self.config.nameservers.clone();
        for nameserver in &dns_config.nameservers {
            if !self.config.nameservers.contains(nameserver) {
                merged.push(nameserver.clone());
            }
        }
        // TODO resolvers only honor a bounded number of nameservers; decide
        // whether to truncate when the merged list exceeds three entries.
        dns_config.nameservers = merged;
    }

    /// Merge search domains: inverse precedence from nameservers. The pod's
    /// own searches stay first, all kept in order; policy domains not
    /// already present are appended after them.
    fn merge_searches(&self, dns_config: &mut PodDnsConfig) {
        let mut merged = dns_config.searches.clone();
        for search in &self.config.searches {
            if !dns_config.searches.contains(search) {
                merged.push(search.clone());
            }
        }
        dns_config.searches = merged;
    }

    /// Merge options: append each policy option whose name the pod has not
    /// already set, in policy declaration order. A name collision suppresses
    /// the add even if the values differ; the pod author's choice wins.
    fn merge_options(&self, dns_config: &mut PodDnsConfig) {
        // An empty option list means "no options configured", never
        // "explicitly configured as empty": append the policy list whole.
        if dns_config.options.is_empty() {
            dns_config.options.extend(self.pod_options.iter().cloned());
            return;
        }

        let mut added: Vec<PodDnsConfigOption> = Vec::new();
        {
            let existing: HashMap<&str, Option<&str>> = dns_config
                .options
                .iter()
                .map(|opt| (opt.name.as_str(), opt.value.as_deref()))
                .collect();
            for opt in &self.pod_options {
                if !existing.contains_key(opt.name.as_str()) {
                    added.push(opt.clone());
                }
            }
        }
        if added.is_empty() {
            return;
        }
        dns_config.options.extend(added);
    }
}

impl Default for Plugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Interface for Plugin {
    fn handles(&self, operation: Operation) -> bool {
        self.handler.handles(operation)
    }
}

impl MutationInterface for Plugin {
    /// Admit injects the cluster DNS configuration into eligible pods.
    ///
    /// No per-request condition is ever grounds for rejecting a pod: every
    /// skip path logs its reason and allows the request through unmodified.
    fn admit(&self, attributes: &mut dyn Attributes) -> AdmissionResult<()> {
        // Ignore all calls to subresources or resources other than pods.
        if !attributes.get_subresource().is_empty() {
            return Ok(());
        }

        let resource = attributes.get_resource();
        if !resource.group.is_empty() || resource.resource != "pods" {
            return Ok(());
        }

        // Dry-run requests must be observable without side effects.
        if attributes.is_dry_run() {
            debug!("dry run, skipping DNS injection");
            return Ok(());
        }

        let namespace = attributes.get_namespace().to_string();
        let name = attributes.get_name().to_string();

        let pod = match attributes
            .get_object_mut()
            .and_then(|obj| obj.as_any_mut().downcast_mut::<Pod>())
        {
            Some(pod) => pod,
            None => {
                // Not a recognizable pod. That is not a policy violation;
                // let the request through untouched.
                warn!(
                    "expected a Pod for {}/{} but got a different object, skipping DNS injection",
                    namespace, name
                );
                return Ok(());
            }
        };

        if !Self::should_inject(pod) {
            info!(
                "skipping DNS injection for {}/{}: dnsPolicy is {}",
                namespace, name, pod.spec.dns_policy
            );
            return Ok(());
        }

        self.inject_dns_config(pod);
        info!(
            "injected dnsConfig into {}/{}: {:?}",
            namespace, name, pod.spec.dns_config
        );

        Ok(())
    }
}
