use anyhow::{anyhow, Result};
use glfw::{
    fail_on_errors, Action, ClientApiHint, Glfw, GlfwReceiver, Key, PWindow, WindowEvent,
    WindowHint, WindowMode,
};

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
const WINDOW_TITLE: &str = "Vulkan";

/// Thin wrapper around the GLFW window and its event receiver. The bootstrap
/// only asks it for the instance extensions the platform needs; everything
/// else is the run loop.
pub struct WindowManager {
    glfw: Glfw,
    window: PWindow,
    receiver: GlfwReceiver<(f64, WindowEvent)>,
}

impl WindowManager {
    pub fn try_new() -> Result<Self> {
        let mut glfw = glfw::init(fail_on_errors!())?;

        // rendering is Vulkan's job, so no client API context
        glfw.window_hint(WindowHint::ClientApi(ClientApiHint::NoApi));
        glfw.window_hint(WindowHint::Resizable(false));

        let (mut window, receiver) = glfw
            .create_window(
                WINDOW_WIDTH,
                WINDOW_HEIGHT,
                WINDOW_TITLE,
                WindowMode::Windowed,
            )
            .ok_or(anyhow!("Failed to create GLFW window"))?;

        window.set_key_polling(true);

        Ok(Self {
            glfw,
            window,
            receiver,
        })
    }

    /// Instance extensions the platform's windowing layer requires.
    pub fn required_instance_extensions(&self) -> Result<Vec<String>> {
        self.glfw
            .get_required_instance_extensions()
            .ok_or(anyhow!("GLFW reports no Vulkan support on this platform"))
    }

    pub fn run_event_loop(&mut self) {
        while !self.window.should_close() {
            self.glfw.poll_events();
            for (_, event) in glfw::flush_messages(&self.receiver) {
                match event {
                    WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
                        self.window.set_should_close(true);
                    }
                    _ => {}
                }
            }
        }
    }
}
