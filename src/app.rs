use anyhow::Context as _;
use cgmath::Vector3;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::gfx::{
    camera::{
        camera_controller::CameraController, camera_utils::CameraManager, orbit_camera::OrbitCamera,
    },
    rendering::render_engine::RenderEngine,
    scene::Scene,
};
use crate::gizmo::widget::{GizmoWidget, WidgetRect};
use crate::ui::{draw_compass_panel, UiManager};

/// The hosting application: a winit event loop driving the primary viewport
/// and the compass widget on one frame clock.
pub struct CompassApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    gizmo: GizmoWidget,
    cursor_position: (f32, f32),
}

impl CompassApp {
    /// Creates the application with an empty scene and an unmounted widget.
    pub async fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        let mut camera = OrbitCamera::new(10.0, 0.5, 0.9, Vector3::new(0.0, 0.0, 0.0), 1.0);
        camera.bounds.min_distance = Some(1.5);
        let controller = CameraController::new(0.005, 0.4);

        let camera_manager = CameraManager::new(camera, controller);
        let scene = Scene::new(camera_manager);

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                scene,
                gizmo: GizmoWidget::new(),
                cursor_position: (0.0, 0.0),
            },
        }
    }

    /// Scene access for seeding demo content before `run`.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.app_state.scene
    }

    /// Runs the application (consumes self and starts the event loop).
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl AppState {
    fn update_gizmo_rect(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let size = window.inner_size();
        self.gizmo.set_rect(WidgetRect::anchored_top_right(
            size.width as f32,
            window.scale_factor() as f32,
        ));
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title("compass3d")
                    .with_inner_size(winit::dpi::LogicalSize::new(1280, 800)),
            )
            .expect("Failed to create window");
        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let (width, height) = window_handle.inner_size().into();
        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);

        let window_clone = window_handle.clone();
        let renderer =
            pollster::block_on(async move { RenderEngine::new(window_clone, width, height).await })
                .expect("Failed to initialize render engine");

        self.scene
            .init_gpu_resources(renderer.device(), renderer.queue());
        self.gizmo.mount(renderer.device());

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.update_gizmo_rect();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.as_ref().cloned() else {
            return;
        };

        // UI gets first refusal on pointer/keyboard events.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if matches!(
                    event.physical_key,
                    winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape)
                ) {
                    self.gizmo.unmount();
                    event_loop.exit();
                    return;
                }
                self.scene
                    .camera_manager
                    .controller
                    .process_keyed_events(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = (position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: winit::event::ElementState::Pressed,
                button: winit::event::MouseButton::Left,
                ..
            } => {
                let consumed = self.gizmo.handle_click(
                    self.cursor_position,
                    Some(&self.scene.camera_manager.camera),
                    Instant::now(),
                );
                if consumed {
                    window.request_redraw();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                self.update_gizmo_rect();
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                self.update_gizmo_rect();
            }
            WindowEvent::CloseRequested => {
                self.gizmo.unmount();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let Some(render_engine) = self.render_engine.as_mut() else {
                    return;
                };

                let now = Instant::now();
                // Frame tick: sync -> billboard -> animate, then the camera
                // uniform refresh, then the passes.
                self.gizmo.update(Some(&mut self.scene.camera_manager), now);
                self.scene.update();

                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    let camera_manager = &mut self.scene.camera_manager;
                    let gizmo = &mut self.gizmo;
                    ui_manager.prepare(&window, |ui| {
                        draw_compass_panel(ui, camera_manager, gizmo, now);
                    });
                }

                let result = if let Some(manager) = self.ui_manager.as_mut() {
                    let mut ui_callback = |device: &wgpu::Device,
                                           queue: &wgpu::Queue,
                                           encoder: &mut wgpu::CommandEncoder,
                                           view: &wgpu::TextureView| {
                        manager.render(device, queue, encoder, view);
                    };
                    render_engine.render_frame(
                        &mut self.scene,
                        &mut self.gizmo,
                        Some(&mut ui_callback),
                    )
                } else {
                    render_engine.render_frame(&mut self.scene, &mut self.gizmo, None)
                };

                match result {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_engine.reconfigure_surface();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory, exiting");
                        self.gizmo.unmount();
                        event_loop.exit();
                    }
                    Err(error) => {
                        log::warn!("dropped frame: {error}");
                    }
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Pointer interactions belong to the UI or the compass when they
        // are under the cursor.
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            if ui_manager.wants_pointer() {
                return;
            }
        }
        if matches!(event, winit::event::DeviceEvent::Button { .. })
            && self.gizmo.rect().contains(self.cursor_position)
        {
            return;
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
