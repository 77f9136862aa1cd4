use std::{
    ffi::{c_void, CStr},
    rc::Rc,
    sync::Arc,
};

use ash::{
    extensions::ext::DebugUtils,
    vk::{
        self, Bool32, DebugUtilsMessageSeverityFlagsEXT, DebugUtilsMessageTypeFlagsEXT,
        DebugUtilsMessengerCallbackDataEXT, DebugUtilsMessengerCreateInfoEXT,
        DebugUtilsMessengerCreateInfoEXTBuilder, DebugUtilsMessengerEXT,
    },
    Entry,
};

use crate::diagnostics::{Channel, Diagnostics, DiagnosticsSink, Severity};

use super::{error::BootstrapError, instance_guard::InstanceGuard};

const CREATE_MESSENGER_FN: &[u8] = b"vkCreateDebugUtilsMessengerEXT\0";

/// Carries the diagnostics sink through the messenger callback's user data
/// pointer. Boxed by its owner so the address stays stable for the lifetime
/// of the messenger it is registered with.
pub struct MessengerRouter {
    sink: Arc<dyn DiagnosticsSink>,
}

impl MessengerRouter {
    pub fn new(sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self { sink }
    }

    fn dispatch(&self, message_severity: DebugUtilsMessageSeverityFlagsEXT, message: &str) {
        let (channel, severity) = classify_severity(message_severity);
        self.sink.log(channel, severity, message);
    }
}

/// Buckets a messenger severity: verbose and info traffic stays on the
/// verbose channel, warnings and errors surface on the user channel.
fn classify_severity(
    message_severity: DebugUtilsMessageSeverityFlagsEXT,
) -> (Channel, Severity) {
    match message_severity {
        DebugUtilsMessageSeverityFlagsEXT::VERBOSE => (Channel::Verbose, Severity::Trace),
        DebugUtilsMessageSeverityFlagsEXT::INFO => (Channel::Verbose, Severity::Info),
        DebugUtilsMessageSeverityFlagsEXT::WARNING => (Channel::User, Severity::Warn),
        DebugUtilsMessageSeverityFlagsEXT::ERROR => (Channel::User, Severity::Error),
        // the callback must never abort, whatever the runtime hands us
        _ => (Channel::Verbose, Severity::Trace),
    }
}

/// Create info for the messenger, subscribed to every severity and message
/// type. Also chained into instance creation so messages emitted during
/// `vkCreateInstance` itself reach the sink.
pub fn messenger_create_info<'a>(
    router: &MessengerRouter,
) -> DebugUtilsMessengerCreateInfoEXTBuilder<'a> {
    DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(
            DebugUtilsMessageSeverityFlagsEXT::ERROR
                | DebugUtilsMessageSeverityFlagsEXT::WARNING
                | DebugUtilsMessageSeverityFlagsEXT::INFO
                | DebugUtilsMessageSeverityFlagsEXT::VERBOSE,
        )
        .message_type(
            DebugUtilsMessageTypeFlagsEXT::GENERAL
                | DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
                | DebugUtilsMessageTypeFlagsEXT::VALIDATION,
        )
        .pfn_user_callback(Some(vulkan_debug_utils_callback))
        .user_data(router as *const MessengerRouter as *mut c_void)
}

unsafe extern "system" fn vulkan_debug_utils_callback(
    message_severity: DebugUtilsMessageSeverityFlagsEXT,
    _message_type: DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const DebugUtilsMessengerCallbackDataEXT,
    p_user_data: *mut c_void,
) -> Bool32 {
    if p_callback_data.is_null() || p_user_data.is_null() {
        return vk::FALSE;
    }
    let router = &*(p_user_data as *const MessengerRouter);
    let message = CStr::from_ptr((*p_callback_data).p_message).to_string_lossy();
    router.dispatch(message_severity, &message);
    // dont skip driver
    vk::FALSE
}

/// RAII for the debug utils messenger that lives alongside the instance.
pub struct DebugUtilsExtension {
    debug_utils: DebugUtils,
    extension: DebugUtilsMessengerEXT,
    // owns the callback's user data; dropped only after the messenger is gone
    _router: Box<MessengerRouter>,
    // need to keep a reference to instance to ensure we get dropped before instance does
    _instance: Rc<InstanceGuard>,
}

impl DebugUtilsExtension {
    pub fn try_new(
        entry: &Entry,
        instance: &Rc<InstanceGuard>,
        diagnostics: &Diagnostics,
    ) -> Result<Self, BootstrapError> {
        let create_fn_name = unsafe { CStr::from_bytes_with_nul_unchecked(CREATE_MESSENGER_FN) };
        let create_fn = unsafe {
            (entry.static_fn().get_instance_proc_addr)(instance.handle(), create_fn_name.as_ptr())
        };
        if create_fn.is_none() {
            return Err(BootstrapError::Platform {
                call: "vkCreateDebugUtilsMessengerEXT",
                result: vk::Result::ERROR_EXTENSION_NOT_PRESENT,
            });
        }

        let router = Box::new(MessengerRouter::new(Arc::clone(diagnostics.sink())));
        let debug_utils = DebugUtils::new(entry, instance);
        let create_info = messenger_create_info(&router);
        let extension = unsafe { debug_utils.create_debug_utils_messenger(&create_info, None) }
            .map_err(BootstrapError::platform("vkCreateDebugUtilsMessengerEXT"))?;

        Ok(Self {
            debug_utils,
            extension,
            _router: router,
            _instance: Rc::clone(instance),
        })
    }
}

impl Drop for DebugUtilsExtension {
    fn drop(&mut self) {
        unsafe {
            self.debug_utils
                .destroy_debug_utils_messenger(self.extension, None)
        }
    }
}
